//! The subset of the Baïkal (sabre-dav 4.x) SQLite schema this crate reads
//! and writes.
//!
//! Production databases are created by Baïkal itself; the sync never creates
//! tables there. The DDL is applied only to in-memory stores and test
//! fixtures.

/// Schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS principals (
    id          INTEGER PRIMARY KEY ASC NOT NULL,
    uri         TEXT NOT NULL,
    email       TEXT,
    displayname TEXT,
    UNIQUE (uri)
);

CREATE TABLE IF NOT EXISTS addressbooks (
    id           INTEGER PRIMARY KEY ASC NOT NULL,
    principaluri TEXT NOT NULL,
    displayname  TEXT,
    uri          TEXT NOT NULL,
    description  TEXT,
    synctoken    INTEGER DEFAULT 1 NOT NULL
);

-- Contacts are read-only to the sync.
CREATE TABLE IF NOT EXISTS cards (
    id            INTEGER PRIMARY KEY ASC NOT NULL,
    addressbookid INTEGER NOT NULL,
    carddata      BLOB,
    uri           TEXT NOT NULL,
    lastmodified  INTEGER,
    etag          TEXT,
    size          INTEGER
);

CREATE TABLE IF NOT EXISTS calendars (
    id         INTEGER PRIMARY KEY ASC NOT NULL,
    synctoken  INTEGER DEFAULT 1 NOT NULL,
    components TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS calendarinstances (
    id                 INTEGER PRIMARY KEY ASC NOT NULL,
    calendarid         INTEGER,
    principaluri       TEXT,
    access             INTEGER,
    displayname        TEXT,
    uri                TEXT NOT NULL,
    description        TEXT,
    calendarorder      INTEGER,
    calendarcolor      TEXT,
    timezone           TEXT,
    transparent        BOOL,
    share_href         TEXT,
    share_displayname  TEXT,
    share_invitestatus INTEGER DEFAULT '2',
    UNIQUE (principaluri, uri),
    UNIQUE (calendarid, principaluri),
    UNIQUE (calendarid, share_href)
);

CREATE TABLE IF NOT EXISTS calendarobjects (
    id             INTEGER PRIMARY KEY ASC NOT NULL,
    calendardata   BLOB NOT NULL,
    uri            TEXT NOT NULL,
    calendarid     INTEGER NOT NULL,
    lastmodified   INTEGER NOT NULL,
    etag           TEXT NOT NULL,
    size           INTEGER NOT NULL,
    componenttype  TEXT,
    firstoccurence INTEGER,
    lastoccurence  INTEGER,
    uid            TEXT
);

-- Append-only; one row per event mutation.
CREATE TABLE IF NOT EXISTS calendarchanges (
    id         INTEGER PRIMARY KEY ASC NOT NULL,
    uri        TEXT,
    synctoken  INTEGER NOT NULL,
    calendarid INTEGER NOT NULL,
    operation  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS calendarobjects_index
    ON calendarobjects (calendarid, uri);
CREATE INDEX IF NOT EXISTS calendarchanges_index
    ON calendarchanges (calendarid, synctoken);
";
