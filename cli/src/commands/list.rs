//! List command - show all listening ports.

use anyhow::Result;
use port_assassin_core::PortObservation;

pub async fn run(port_filter: Option<u16>, name_filter: Option<String>, json: bool) -> Result<()> {
    let mut ports = super::port_service().active_ports().await?;

    // Apply filters
    if let Some(p) = port_filter {
        ports.retain(|port| port.port == p);
    }
    if let Some(ref name) = name_filter {
        let name_lower = name.to_lowercase();
        ports.retain(|port| port.process_name.to_lowercase().contains(&name_lower));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&ports)?);
        return Ok(());
    }

    if ports.is_empty() {
        println!("No listening ports found.");
        return Ok(());
    }

    print_table(&ports);
    println!("\nTotal: {} ports", ports.len());
    Ok(())
}

fn print_table(ports: &[PortObservation]) {
    println!("{:<6} {:<8} PROCESS", "PORT", "PID");
    println!("{}", "-".repeat(40));

    for port in ports {
        println!(
            "{:<6} {:<8} {}",
            port.port,
            port.pid,
            truncate(&port.process_name, 30)
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}
