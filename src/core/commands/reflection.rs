// src/core/commands/reflection.rs

use super::Params;
use crate::core::handler::CommandContext;
use crate::core::protocol::AckError;

/// Lists the commands the session may run right now.
pub fn commands(ctx: &mut CommandContext<'_>, _params: &Params) -> Result<Vec<String>, AckError> {
    Ok(list(ctx, true))
}

/// Lists the commands the session is currently refused.
pub fn notcommands(
    ctx: &mut CommandContext<'_>,
    _params: &Params,
) -> Result<Vec<String>, AckError> {
    Ok(list(ctx, false))
}

fn list(ctx: &CommandContext<'_>, permitted: bool) -> Vec<String> {
    let authenticated = ctx.session.is_authenticated;
    let registry = ctx.registry();
    registry
        .names()
        .into_iter()
        .filter(|name| {
            let allowed = authenticated
                || registry
                    .get(name)
                    .is_some_and(|descriptor| !descriptor.auth_required);
            allowed == permitted
        })
        .map(|name| format!("command: {name}"))
        .collect()
}
