//! Database schema and migrations for chanboard.
//!
//! Migrations are applied in order; the `schema_version` table records
//! which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Boards
    r#"
CREATE TABLE boards (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    short_id            TEXT NOT NULL UNIQUE,
    name                TEXT NOT NULL,
    description         TEXT,
    category            TEXT NOT NULL DEFAULT 'General',
    nsfw                INTEGER NOT NULL DEFAULT 0,
    max_file_size       INTEGER NOT NULL DEFAULT 4194304,
    allowed_file_types  TEXT NOT NULL DEFAULT 'image/jpeg,image/png,image/gif,image/webp',
    sort_order          INTEGER NOT NULL DEFAULT 0,
    is_active           INTEGER NOT NULL DEFAULT 1,
    created_at          TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_boards_sort_order ON boards(sort_order);
CREATE INDEX idx_boards_is_active ON boards(is_active);
"#,
    // v2: Posts (threads are posts without a parent)
    r#"
CREATE TABLE posts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id        INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    parent_id       INTEGER REFERENCES posts(id) ON DELETE CASCADE,
    name            TEXT NOT NULL,
    subject         TEXT,
    message         TEXT NOT NULL DEFAULT '',
    image_name      TEXT,
    image_stored    TEXT,
    image_mime      TEXT,
    image_size      INTEGER,
    image_width     INTEGER,
    image_height    INTEGER,
    ip_address      TEXT NOT NULL,
    is_pinned       INTEGER NOT NULL DEFAULT 0,
    is_locked       INTEGER NOT NULL DEFAULT 0,
    is_deleted      INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL DEFAULT (datetime('now')),
    bumped_at       TEXT NOT NULL DEFAULT (datetime('now')),
    bump_order      INTEGER NOT NULL DEFAULT 0   -- id of the post that last bumped the thread
);

CREATE INDEX idx_posts_board_id ON posts(board_id);
CREATE INDEX idx_posts_parent_id ON posts(parent_id);
CREATE INDEX idx_posts_ip_address ON posts(ip_address);
CREATE INDEX idx_posts_bump_order ON posts(board_id, bump_order);
"#,
    // v3: Users and admin sessions
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL,
    password    TEXT NOT NULL,           -- Argon2 hash
    role        TEXT NOT NULL DEFAULT 'moderator',  -- 'moderator', 'admin'
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    last_login  TEXT
);

CREATE UNIQUE INDEX idx_users_username_nocase ON users(username COLLATE NOCASE);

CREATE TABLE sessions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token_hash  TEXT NOT NULL UNIQUE,    -- SHA-256 hex of the bearer token
    expires_at  TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_sessions_user_id ON sessions(user_id);
CREATE INDEX idx_sessions_expires_at ON sessions(expires_at);
"#,
    // v4: Bans
    r#"
CREATE TABLE bans (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    ip_address  TEXT NOT NULL,
    reason      TEXT NOT NULL,
    expires_at  TEXT,                    -- NULL for permanent bans
    is_active   INTEGER NOT NULL DEFAULT 1,
    banned_by   INTEGER REFERENCES users(id) ON DELETE SET NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_bans_ip_address ON bans(ip_address);
CREATE INDEX idx_bans_is_active ON bans(is_active);
"#,
    // v5: Reports
    r#"
CREATE TABLE reports (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    reason      TEXT NOT NULL,
    details     TEXT,
    reporter_ip TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'open',  -- 'open', 'resolved', 'dismissed'
    resolved_by INTEGER REFERENCES users(id) ON DELETE SET NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_reports_post_id ON reports(post_id);
CREATE INDEX idx_reports_status ON reports(status);
"#,
    // v6: Site settings
    r#"
CREATE TABLE settings (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

INSERT INTO settings (key, value) VALUES ('posting_enabled', 'true');
INSERT INTO settings (key, value) VALUES ('announcement', '');
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_migrations_are_valid_sql() {
        for migration in MIGRATIONS {
            assert!(!migration.trim().is_empty());
            assert!(migration.contains("CREATE TABLE"));
        }
    }

    #[test]
    fn test_posts_migration_is_self_referential() {
        let posts = MIGRATIONS[1];
        assert!(posts.contains("CREATE TABLE posts"));
        assert!(posts.contains("parent_id"));
        assert!(posts.contains("REFERENCES posts(id)"));
        assert!(posts.contains("bumped_at"));
        assert!(posts.contains("is_deleted"));
    }

    #[test]
    fn test_bans_migration_contains_expiry() {
        let bans = MIGRATIONS[3];
        assert!(bans.contains("CREATE TABLE bans"));
        assert!(bans.contains("expires_at"));
        assert!(bans.contains("banned_by"));
    }
}
