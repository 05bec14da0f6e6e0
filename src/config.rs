use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_DB_PATH: &str = "trivia.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Reads `DB_PATH` and `BIND_ADDR`, loading a `.env` file first when one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let db_path = dotenv::var("DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_owned());
        let bind_addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        Self::new(db_path, &bind_addr)
    }

    pub fn new(db_path: String, bind_addr: &str) -> anyhow::Result<Self> {
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR {bind_addr:?} is not a socket address"))?;
        Ok(Self { db_path, bind_addr })
    }
}
