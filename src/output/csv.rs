//! CSV output formatting for allocation results.

use crate::models::AllocationResult;

pub const CSV_HEADER: &str =
    "name,network,prefix_length,first_host,last_host,broadcast,usable_hosts";

/// Quote a field if it contains a comma or double quote.
pub fn escape_csv_field(input: &str) -> String {
    if input.contains(',') || input.contains('"') {
        // Excel does not like spaces after the comma between fields.
        let escaped = input.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        input.to_string()
    }
}

/// Header plus one row per allocation, in address order.
pub fn allocation_csv(result: &AllocationResult) -> String {
    let mut rows = vec![CSV_HEADER.to_string()];
    rows.extend(result.allocations.iter().map(|a| {
        format!(
            "{name},{network},{prefix},{first},{last},{broadcast},{hosts}",
            name = escape_csv_field(&a.name),
            network = a.network_address,
            prefix = a.prefix_length,
            first = a.first_host,
            last = a.last_host,
            broadcast = a.broadcast_address,
            hosts = a.usable_hosts,
        )
    }));
    let mut csv = rows.join("\n");
    csv.push('\n');
    csv
}

/// Print the allocation CSV to stdout, warnings to the log.
pub fn print_allocation_csv(result: &AllocationResult) {
    log::info!(
        "# Got allocation count = {} warnings = {}",
        result.allocations.len(),
        result.warnings.len()
    );
    print!("{}", allocation_csv(result));
    for warning in &result.warnings {
        log::warn!("{warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubnetRequest;
    use crate::processing::allocate;

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_allocation_csv() {
        let requests = vec![
            SubnetRequest::new("Office, 2nd floor", 50),
            SubnetRequest::new("WAN", 2),
        ];
        let result = allocate("10.0.0.0", 24, &requests).unwrap();
        let csv = allocation_csv(&result);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "\"Office, 2nd floor\",10.0.0.0,26,10.0.0.1,10.0.0.62,10.0.0.63,62"
        );
        assert_eq!(lines[2], "WAN,10.0.0.64,31,10.0.0.64,10.0.0.65,10.0.0.65,2");
    }
}
