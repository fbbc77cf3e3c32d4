//! Directive parser for queue message bodies.
//!
//! Body grammar: `<kind>,<duration>[,<cpuPercent>]`, e.g. `c,00:15:00,50`.

mod span;
pub use span::parse_span;

use crate::{COMPUTE_TAG, CpuPercent, DirectiveError, JobDirective};

const FIELD_SEPARATOR: char = ',';

/// Parse a raw message body into a directive.
///
/// - fewer than two fields: `Ok(None)`, the message is a no-op;
/// - unparsable duration: error;
/// - leading `c` without a valid third field: error;
/// - any other leading token: an inert directive.
///
/// Fields after the third are ignored.
pub fn parse(raw: &str) -> Result<Option<JobDirective>, DirectiveError> {
    let fields: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
    if fields.len() < 2 {
        return Ok(None);
    }

    let duration = parse_span(fields[1])?;
    let tag = fields[0];

    if tag == COMPUTE_TAG {
        let cpu_percent: CpuPercent = fields
            .get(2)
            .ok_or(DirectiveError::MissingCpuPercent)?
            .parse()?;
        return Ok(Some(JobDirective::compute(duration, cpu_percent)));
    }
    Ok(Some(JobDirective::inert(tag, duration)))
}
