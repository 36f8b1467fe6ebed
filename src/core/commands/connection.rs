// src/core/commands/connection.rs

//! Connection-level commands: `close`, `ping` and `password`.

use super::{CommandId, Params};
use crate::core::handler::CommandContext;
use crate::core::protocol::{AckError, AckKind};
use tracing::info;

/// Marks the session closed. The connection loop tears the stream down and
/// writes nothing further.
pub fn close(ctx: &mut CommandContext<'_>, _params: &Params) -> Result<Vec<String>, AckError> {
    ctx.session.close();
    Ok(Vec::new())
}

pub fn ping(_ctx: &mut CommandContext<'_>, _params: &Params) -> Result<Vec<String>, AckError> {
    Ok(Vec::new())
}

pub fn password(ctx: &mut CommandContext<'_>, params: &Params) -> Result<Vec<String>, AckError> {
    let given = params.get("password").map(String::as_str);
    match ctx.state().password() {
        Some(expected) if Some(expected) == given => {
            info!("Session {} authenticated.", ctx.session.id());
            ctx.session.is_authenticated = true;
            Ok(Vec::new())
        }
        _ => Err(AckError::new(
            AckKind::Password,
            CommandId::Password.name(),
            "incorrect password",
        )),
    }
}
