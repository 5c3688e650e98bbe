use grepcidr::{compile_patterns, line_matches, MatchOptions};

fn main() {
    println!("Simple grepcidr Usage Example\n");

    let index = compile_patterns(
        ["192.168.0.0/16", "10.0.0.0/8", "2001:db8::/32"],
        false,
    )
    .unwrap();

    let log_lines = vec![
        "2024-03-01 connection accepted from 192.168.1.42",
        "2024-03-01 connection accepted from 10.1.2.3",
        "2024-03-01 connection refused from 8.8.8.8",
        "2024-03-01 connection accepted from 2001:db8::dead:beef",
        "2024-03-01 connection refused from ::ffff:8.8.8.8",
        "no address here at all",
    ];

    println!("Default mode (emit lines with a matching address):\n");
    let opts = MatchOptions::default();
    for line in &log_lines {
        if line_matches(&index, &opts, line.as_bytes()) {
            println!("  MATCH: {line}");
        }
    }

    println!("\nInvert mode (emit lines with no matching address):\n");
    let invert_opts = MatchOptions { invert: true, ..Default::default() };
    for line in &log_lines {
        if line_matches(&index, &invert_opts, line.as_bytes()) {
            println!("  MATCH: {line}");
        }
    }

    let stats = index.stats();
    println!("\nIndex stats: {} IPv4 ranges, {} IPv6 ranges", stats.v4_ranges, stats.v6_ranges);
}
