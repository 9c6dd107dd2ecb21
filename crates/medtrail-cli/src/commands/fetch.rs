//! `medtrail fetch` - read an event back as a given caller.

use anyhow::Result;
use clap::Args;
use medtrail_audit::{Event, EventId, Response};
use medtrail_core::Principal;

use crate::host::Host;
use crate::output::{OutputFormat, render_event, render_json};

/// Arguments for `medtrail fetch`.
#[derive(Debug, Args)]
pub(crate) struct FetchArgs {
    /// Id returned by `record`
    pub(crate) event_id: u64,

    /// Principal signing the transaction
    #[arg(long)]
    pub(crate) sender: Principal,

    /// Immediate caller, when relayed through a contract
    #[arg(long)]
    pub(crate) contract_caller: Option<Principal>,
}

/// Run `fetch`. Returns whether the event was returned.
pub(crate) async fn run(host: &Host, args: FetchArgs, format: OutputFormat) -> Result<bool> {
    let ctx = host.context(args.sender, args.contract_caller, None);
    let id = EventId(args.event_id);

    let response: Response<Event> = Response::from_result(host.trail().fetch(&ctx, id).await)?;
    match format {
        OutputFormat::Json => println!("{}", render_json(&response)?),
        OutputFormat::Pretty => println!("{}", render_event(id, &response)),
    }
    Ok(response.is_ok())
}
