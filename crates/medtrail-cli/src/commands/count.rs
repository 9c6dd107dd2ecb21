//! `medtrail count` - number of recorded events.

use anyhow::Result;
use medtrail_audit::Response;

use crate::host::Host;
use crate::output::{OutputFormat, render_count, render_json};

/// Print the event count. Reveals no event content.
pub(crate) fn run(host: &Host, format: OutputFormat) -> Result<()> {
    let count = host.trail().event_count();
    match format {
        OutputFormat::Json => println!("{}", render_json(&Response::Ok(count))?),
        OutputFormat::Pretty => println!("{}", render_count(count)),
    }
    Ok(())
}
