//! `medtrail record` - append an event as a given caller.

use anyhow::Result;
use clap::Args;
use medtrail_audit::{EventId, Response};
use medtrail_core::Principal;

use crate::host::Host;
use crate::output::{OutputFormat, render_json, render_recorded};

/// Arguments for `medtrail record`.
#[derive(Debug, Args)]
pub(crate) struct RecordArgs {
    /// Event category, e.g. `REGISTER_PATIENT`
    pub(crate) event_type: String,

    /// Resource the event concerns
    pub(crate) resource_id: String,

    /// Principal the event is about
    pub(crate) actor: Principal,

    /// Optional annotation
    #[arg(long)]
    pub(crate) detail: Option<String>,

    /// Principal signing the transaction
    #[arg(long)]
    pub(crate) sender: Principal,

    /// Immediate caller, when relayed through a contract
    #[arg(long)]
    pub(crate) contract_caller: Option<Principal>,

    /// Block time in seconds since the epoch (defaults to now)
    #[arg(long)]
    pub(crate) time: Option<u64>,
}

/// Run `record`. Returns whether the trail accepted the event.
pub(crate) async fn run(host: &mut Host, args: RecordArgs, format: OutputFormat) -> Result<bool> {
    let ctx = host.context(args.sender, args.contract_caller, args.time);
    let trail = host.trail_mut();

    let result = match args.detail {
        Some(detail) => {
            trail
                .record_with_detail(
                    &ctx,
                    &args.event_type,
                    &args.resource_id,
                    args.actor,
                    &detail,
                )
                .await
        },
        None => {
            trail
                .record(&ctx, &args.event_type, &args.resource_id, args.actor)
                .await
        },
    };

    let response: Response<EventId> = Response::from_result(result)?;
    match format {
        OutputFormat::Json => println!("{}", render_json(&response)?),
        OutputFormat::Pretty => println!("{}", render_recorded(&response)),
    }
    Ok(response.is_ok())
}
