//! Human-readable summary printed by the binaries after a run.

use crate::core::report::PortReport;
use crate::utils::error::PortMapError;

pub fn print_summary(report: &PortReport) {
    let summary = &report.port_mapping_summary;

    println!();
    println!("DOCKER PORT CONFIGURATION");
    println!("{}", "=".repeat(70));
    println!("Total Ports: {}", summary.total_ports);
    println!("Available Ports: {}", summary.available_ports);
    println!("Conflict Ports: {}", summary.conflict_ports);
    println!("Availability: {:.1}%", summary.availability_percentage);
    println!("Total Services: {}", summary.total_services);

    println!();
    println!("Component Port Ranges:");
    for (component, [start, end]) in &report.port_ranges {
        println!("  {}: {}-{}", component, start, end);
    }

    println!();
    if report.port_conflicts.is_empty() {
        println!("✅ No port conflicts detected");
    } else {
        println!("Port Conflicts:");
        for conflict in &report.port_conflicts {
            println!(
                "  Port {}: {} <-> {}",
                conflict.port, conflict.services[0], conflict.services[1]
            );
        }
    }
}

/// Logs `err` with its category and exits with its code.
pub fn exit_with(err: &PortMapError) -> ! {
    tracing::error!(
        "❌ Port configuration failed: {} (Category: {:?}, Severity: {:?})",
        err,
        err.category(),
        err.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", err.recovery_suggestion());

    eprintln!("❌ {}", err.user_friendly_message());
    eprintln!("💡 {}", err.recovery_suggestion());

    std::process::exit(err.exit_code());
}
