//! Kill command - terminate a process by PID or by the port it listens on.

use anyhow::Result;

#[cfg(unix)]
pub async fn run(pid: Option<u32>, port: Option<u16>, graceful: bool, sudo: bool) -> Result<()> {
    use anyhow::Context;

    let service = super::port_service();

    if let Some(port) = port {
        match service.kill_port(port, graceful).await? {
            Some(owner) => println!("Killed {}", owner),
            None => println!("Nothing is listening on port {}", port),
        }
        return Ok(());
    }

    let pid = pid.context("Either a PID or --port is required")?;
    if sudo {
        let credential = read_password().context("Failed to read password from stdin")?;
        service.kill_with_password(pid, &credential).await?;
    } else {
        service.kill(pid, graceful).await?;
    }

    println!("Killed process {}", pid);
    Ok(())
}

#[cfg(not(unix))]
pub async fn run(_pid: Option<u32>, _port: Option<u16>, _graceful: bool, _sudo: bool) -> Result<()> {
    anyhow::bail!("Killing processes is only supported on Unix hosts")
}

/// Read a single line from stdin as the sudo password.
#[cfg(unix)]
fn read_password() -> std::io::Result<port_assassin_core::Credential> {
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(port_assassin_core::Credential::new(
        line.trim_end_matches(['\r', '\n']),
    ))
}
