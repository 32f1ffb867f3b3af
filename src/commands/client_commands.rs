//! Client-related CLI commands
//!
//! Handlers write their output to the supplied writer so the binary can
//! pass stdout and tests can pass a buffer.

use std::io::Write;

use crate::db::{create_client_table, ClientRepository, ConnectionProvider};
use crate::error::{AppError, AppResult};

/// Print every client as `id - name (email)`, or as a JSON array
pub fn list_clients<P, W>(repo: &ClientRepository<P>, json: bool, out: &mut W) -> AppResult<()>
where
    P: ConnectionProvider,
    W: Write,
{
    let clients = repo.list_all()?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &clients)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "=== Registered clients ===")?;
    for client in &clients {
        writeln!(out, "{} - {} ({})", client.id, client.name, client.email)?;
    }
    Ok(())
}

/// Show a single client
pub fn show_client<P, W>(
    repo: &ClientRepository<P>,
    id: i64,
    json: bool,
    out: &mut W,
) -> AppResult<()>
where
    P: ConnectionProvider,
    W: Write,
{
    let client = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("client {}", id)))?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &client)?;
        writeln!(out)?;
    } else {
        writeln!(out, "id:         {}", client.id)?;
        writeln!(out, "name:       {}", client.name)?;
        writeln!(out, "email:      {}", client.email)?;
        writeln!(out, "phone:      {}", client.phone)?;
        writeln!(out, "created at: {}", client.created_at)?;
    }
    Ok(())
}

/// Create a client and print its new id
pub fn create_client<P, W>(
    repo: &ClientRepository<P>,
    name: &str,
    email: &str,
    phone: &str,
    out: &mut W,
) -> AppResult<i64>
where
    P: ConnectionProvider,
    W: Write,
{
    let id = repo.create(name, email, phone)?;
    writeln!(out, "{}", id)?;
    Ok(id)
}

/// Update a client's phone and print the number of rows affected
pub fn update_client_phone<P, W>(
    repo: &ClientRepository<P>,
    id: i64,
    phone: &str,
    out: &mut W,
) -> AppResult<u64>
where
    P: ConnectionProvider,
    W: Write,
{
    let affected = repo.update_phone(id, phone)?;
    writeln!(out, "{}", affected)?;
    Ok(affected)
}

/// Create the client table if missing
pub fn init_schema<P: ConnectionProvider>(provider: &P) -> AppResult<()> {
    let mut conn = provider.get_connection()?;
    create_client_table(&mut conn, provider.dialect())?;
    Ok(())
}
