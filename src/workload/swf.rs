//! Standard Workload Format reader (spec.md §6, optional collaborator).

use std::io::BufRead;

use super::error::WorkloadError;

/// One accepted SWF record: the columns the simulator actually consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadRecord {
    pub job_id: i64,
    pub submit_time: i64,
    pub duration: i64,
    pub n_resources: usize,
}

/// Parses SWF-formatted text from `reader`, skipping malformed lines
/// (logged via `sink`) rather than aborting the whole read (spec.md §7's
/// "trace errors are logged and skipped").
pub fn read_swf<R: BufRead>(reader: R, sink: &mut dyn crate::logging::Sink) -> Result<Vec<WorkloadRecord>, WorkloadError> {
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| WorkloadError::Io(e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_line(trimmed) {
            Some(record) => records.push(record),
            None => sink.record(0, &format!("skipping malformed SWF line {}: {trimmed}", line_no + 1)),
        }
    }
    Ok(records)
}

fn parse_line(line: &str) -> Option<WorkloadRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let job_id: i64 = fields.first()?.parse().ok()?;
    let submit_time: i64 = fields.get(1)?.parse().ok()?;
    let duration: i64 = fields.get(3)?.parse().ok()?;
    let n_resources_raw: i64 = fields.get(4)?.parse().ok()?;

    if duration <= 0 {
        return None;
    }
    let n_resources = if n_resources_raw <= 0 { 1 } else { n_resources_raw as usize };

    Some(WorkloadRecord {
        job_id,
        submit_time,
        duration,
        n_resources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::TracingSink;

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# a comment\n\n1 0 0 100 4\n";
        let mut sink = TracingSink;
        let records = read_swf(text.as_bytes(), &mut sink).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].job_id, 1);
        assert_eq!(records[0].n_resources, 4);
    }

    #[test]
    fn non_positive_n_resources_is_coerced_to_one() {
        let text = "1 0 0 100 0\n";
        let mut sink = TracingSink;
        let records = read_swf(text.as_bytes(), &mut sink).unwrap();
        assert_eq!(records[0].n_resources, 1);
    }

    #[test]
    fn non_positive_duration_is_discarded() {
        let text = "1 0 0 0 4\n2 0 0 50 4\n";
        let mut sink = TracingSink;
        let records = read_swf(text.as_bytes(), &mut sink).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].job_id, 2);
    }

    #[test]
    fn malformed_line_is_skipped_not_fatal() {
        let text = "not a valid line\n1 0 0 100 4\n";
        let mut sink = TracingSink;
        let records = read_swf(text.as_bytes(), &mut sink).unwrap();
        assert_eq!(records.len(), 1);
    }
}
