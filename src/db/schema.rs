//! Database schema and migrations for COBBS.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - users table
    r#"
-- Users table for signup and login
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,
    email       TEXT NOT NULL UNIQUE,
    password    TEXT NOT NULL,           -- Argon2 hash
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    last_login  TEXT
);
"#,
    // v2: Post tables, one per kind
    r#"
-- Lost & found items
CREATE TABLE lostfound (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    category    TEXT NOT NULL,
    kind        TEXT,                    -- 'Lost' or 'Found'
    item        TEXT NOT NULL,
    description TEXT NOT NULL,
    image       TEXT,                    -- stored filename
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Complaints
CREATE TABLE complaint (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    issue       TEXT NOT NULL,
    image       TEXT,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Help & sharing requests
CREATE TABLE help (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    message     TEXT NOT NULL,
    share_file  TEXT,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v3: Comments on posts (post_id is a weak reference, no FK)
    r#"
CREATE TABLE comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL,
    body        TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_comments_post_id ON comments(post_id);
"#,
];
