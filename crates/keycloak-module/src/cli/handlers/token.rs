//! Token retrieval handler for the get_token module

use crate::arguments::ModuleArgs;
use crate::config::ModuleDefaults;
use crate::error::Result;
use crate::result::ModuleSuccess;
use keycloak_sdk::KeycloakClient;
use tracing::debug;

/// Fetch a token and, when the task asks for it, a client secret
///
/// The secret lookup authenticates with the token just obtained, so the
/// authenticating user or client needs rights to view the target client.
/// Both the credentials and the lookup are validated before any request.
pub async fn handle_get_token(args: &ModuleArgs, defaults: &ModuleDefaults) -> Result<ModuleSuccess> {
    let params = args.connection_params(defaults)?;
    let grant = params.grant()?;
    let lookup = args.secret_lookup();
    if let Some(lookup) = &lookup {
        lookup.validate()?;
    }
    debug!(?params, ?grant, ?lookup, "Resolved module arguments");

    let client = KeycloakClient::new(&params)?;
    debug!(base_url = client.base_url(), "Connecting to Keycloak");

    let token = client
        .request_token(&params.realm, &params.client_id, &grant)
        .await?;

    let client_secret = match &lookup {
        Some(lookup) => Some(
            client
                .get_client_secret(lookup, &token.access_token)
                .await?,
        ),
        None => None,
    };

    Ok(ModuleSuccess::new(token, client_secret))
}
