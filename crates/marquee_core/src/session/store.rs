//! SQLite-backed session store.
//!
//! The record is kept as two rows in `kv_entries` under store `session`.
//! Both rows change inside one transaction and the watch channel is updated
//! while the connection lock is still held, so observers see writes in commit
//! order.

use super::{Session, SessionError, SessionResult, SessionStore};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;
use tokio::sync::watch;

pub const SESSION_STORE_NAME: &str = "session";
pub const TOKEN_KEY: &str = "auth_token";
pub const ROLE_KEY: &str = "user_role";

pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
    current: watch::Sender<Session>,
}

impl SqliteSessionStore {
    /// Wraps a migrated connection and loads the persisted session.
    ///
    /// Use `crate::db::open_db` or `open_db_in_memory` to obtain `conn`.
    pub fn new(conn: Connection) -> SessionResult<Self> {
        let session = Session {
            token: read_key(&conn, TOKEN_KEY)?,
            role: read_key(&conn, ROLE_KEY)?,
        };
        info!(
            "event=session_load module=session status=ok has_token={} has_role={}",
            session.token.is_some(),
            session.role.is_some()
        );
        let (current, _) = watch::channel(session);
        Ok(Self {
            conn: Mutex::new(conn),
            current,
        })
    }

    fn write(&self, op: &'static str, session: Session) -> SessionResult<()> {
        let mut conn = self.conn.lock().map_err(|_| SessionError::Poisoned)?;
        if let Err(err) = persist(&mut conn, &session) {
            error!("event=session_write module=session status=error op={op} error={err}");
            return Err(err);
        }
        self.current.send_replace(session);
        info!("event=session_write module=session status=ok op={op}");
        Ok(())
    }
}

impl SessionStore for SqliteSessionStore {
    fn snapshot(&self) -> Session {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        self.current.subscribe()
    }

    fn save_session(&self, token: &str, role: &str) -> SessionResult<()> {
        self.write(
            "save",
            Session {
                token: Some(token.to_string()),
                role: Some(role.to_string()),
            },
        )
    }

    fn clear_session(&self) -> SessionResult<()> {
        self.write("clear", Session::default())
    }
}

fn persist(conn: &mut Connection, session: &Session) -> SessionResult<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM kv_entries WHERE store = ?1;",
        params![SESSION_STORE_NAME],
    )?;
    for (key, value) in [(TOKEN_KEY, &session.token), (ROLE_KEY, &session.role)] {
        if let Some(value) = value {
            tx.execute(
                "INSERT INTO kv_entries (store, key, value) VALUES (?1, ?2, ?3);",
                params![SESSION_STORE_NAME, key, value],
            )?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn read_key(conn: &Connection, key: &str) -> SessionResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_entries WHERE store = ?1 AND key = ?2;",
            params![SESSION_STORE_NAME, key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}
