//! System information: OS, battery, disks, memory, CPU, network, processes.

use anyhow::Result;
use async_trait::async_trait;
use services::system_info::{
    self, to_gib, BatteryInfo, ChargeState, CpuInfo, DiskInfo, MemoryInfo, NetworkInfo, OsInfo,
    ProcessInfo,
};
use shared::handler::{contains_any, Handler};
use std::sync::Arc;

use super::human_size;
use crate::registry::HandlerEnv;

pub const ID: &str = "system_tools";

const TOP_PROCESSES: usize = 5;

pub fn build(_env: &HandlerEnv) -> Arc<dyn Handler> {
    Arc::new(SystemTools)
}

pub struct SystemTools;

/// Run blocking work off the async worker threads.
async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work).await?)
}

fn format_os(info: &OsInfo) -> String {
    format!(
        "🖥️ **Systémové informácie:**\n\
         - **Systém:** {} {}\n\
         - **Jadro:** {}\n\
         - **Architektúra:** {}\n\
         - **Procesor:** {}\n\
         - **Počítač:** {}\n\
         - **Užívateľ:** {}\n\
         - **Pracovný priečinok:** {}",
        info.name,
        info.version,
        info.kernel,
        info.arch,
        info.cpu_brand,
        info.host_name,
        info.user,
        info.working_dir
    )
}

fn format_battery(battery: Option<&BatteryInfo>) -> String {
    let Some(b) = battery else {
        return "ℹ️ Informácie o batérii nie sú dostupné".into();
    };
    let plugged = match b.state {
        ChargeState::Charging | ChargeState::Full => "Áno",
        ChargeState::Discharging => "Nie",
        ChargeState::Unknown => "Neznáme",
    };
    let left = b
        .seconds_left
        .map(|s| format!("{}h {}m", s / 3600, (s % 3600) / 60))
        .unwrap_or_else(|| "Neznámy".into());
    format!(
        "🔋 **Stav batérie:** {}% | Zapojená: {} | Zostáva: {}",
        b.percent, plugged, left
    )
}

fn format_disks(disks: &[DiskInfo]) -> String {
    if disks.is_empty() {
        return "ℹ️ Nenašli sa žiadne disky".into();
    }
    let mut out = String::from("💾 **Úložisko:**");
    for d in disks {
        out.push_str(&format!(
            "\n- {}: celkom {} GB, použité {} GB ({:.1}%), voľné {} GB",
            d.mount_point,
            to_gib(d.total),
            to_gib(d.used()),
            d.percent_used(),
            to_gib(d.available)
        ));
    }
    out
}

fn format_memory(mem: &MemoryInfo) -> String {
    format!(
        "🧠 **Pamäť RAM:**\n- Celkom: {} GB\n- Použité: {} GB ({:.1}%)\n- Dostupné: {} GB",
        to_gib(mem.total),
        to_gib(mem.used),
        mem.percent_used(),
        to_gib(mem.available)
    )
}

fn format_cpu(cpu: &CpuInfo) -> String {
    let mut out = format!(
        "⚡ **CPU:**\n- Použitie: {:.1}%\n- Jadrá: {}",
        cpu.usage_percent, cpu.cores
    );
    if cpu.frequency_mhz > 0 {
        out.push_str(&format!("\n- Frekvencia: {} MHz", cpu.frequency_mhz));
    }
    out
}

fn format_network(net: &NetworkInfo) -> String {
    let mut out = format!(
        "🔌 **Sieťové informácie:**\n- Hostname: {}\n- Lokálna IP: {}\n\n**Rozhrania:**",
        net.host_name,
        net.local_ip.as_deref().unwrap_or("neznáma")
    );
    for iface in &net.interfaces {
        out.push_str(&format!(
            "\n- {} ({}): prijaté {}, odoslané {}",
            iface.name,
            iface.mac,
            human_size(iface.received),
            human_size(iface.transmitted)
        ));
    }
    out
}

fn format_processes(processes: &[ProcessInfo], total: usize) -> String {
    let mut out = format!("📊 **Top {} procesov podľa pamäte:**", processes.len());
    for (i, p) in processes.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} (PID: {}) - {:.1}% RAM",
            i + 1,
            p.name,
            p.pid,
            p.memory_percent
        ));
    }
    out.push_str(&format!("\n\nCelkový počet procesov: {}", total));
    out
}

#[async_trait]
impl Handler for SystemTools {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Systémové nástroje"
    }

    fn description(&self) -> &'static str {
        "Informácie o systéme, batérii, disku, pamäti, CPU, sieti a procesoch"
    }

    fn triggers(&self) -> &'static [&'static str] {
        &[
            "systémové info",
            "informácie o systéme",
            "stav batérie",
            "voľné miesto",
            "pamäť ram",
            "cpu používanie",
            "sieťové pripojenie",
            "otvorené porty",
            "bežiace procesy",
            "rýchlosť internetu",
            "systém",
        ]
    }

    async fn handle(&self, command: &str) -> Result<String> {
        if contains_any(command, &["systémové info", "informácie o systéme"]) {
            let info = blocking(system_info::os_info).await?;
            Ok(format_os(&info))
        } else if contains_any(command, &["stav batérie"]) {
            let battery = blocking(system_info::battery_info).await??;
            Ok(format_battery(battery.as_ref()))
        } else if contains_any(command, &["voľné miesto"]) {
            let disks = blocking(system_info::disk_info).await?;
            Ok(format_disks(&disks))
        } else if contains_any(command, &["pamäť ram"]) {
            let mem = blocking(system_info::memory_info).await?;
            Ok(format_memory(&mem))
        } else if contains_any(command, &["cpu používanie"]) {
            let cpu = blocking(system_info::cpu_info).await?;
            Ok(format_cpu(&cpu))
        } else if contains_any(command, &["sieťové pripojenie"]) {
            let net = blocking(system_info::network_info).await?;
            Ok(format_network(&net))
        } else if contains_any(command, &["bežiace procesy"]) {
            let (top, total) = blocking(|| system_info::top_processes(TOP_PROCESSES)).await?;
            Ok(format_processes(&top, total))
        } else if contains_any(command, &["rýchlosť internetu"]) {
            Ok("🔧 Test rýchlosti internetu momentálne nie je dostupný.".into())
        } else {
            Ok(format!(
                "ℹ️ Príkaz '{}' ešte nie je implementovaný v module Systémové nástroje",
                command
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_battery() {
        let b = BatteryInfo {
            percent: 42,
            state: ChargeState::Discharging,
            seconds_left: Some(3 * 3600 + 15 * 60),
        };
        let text = format_battery(Some(&b));
        assert!(text.contains("42%"));
        assert!(text.contains("Zapojená: Nie"));
        assert!(text.contains("3h 15m"));

        assert!(format_battery(None).contains("nie sú dostupné"));
    }

    #[test]
    fn test_format_memory() {
        let gib = 1024 * 1024 * 1024;
        let text = format_memory(&MemoryInfo {
            total: 16 * gib,
            used: 4 * gib,
            available: 12 * gib,
        });
        assert!(text.contains("Celkom: 16 GB"));
        assert!(text.contains("(25.0%)"));
    }

    #[test]
    fn test_format_processes() {
        let procs = vec![
            ProcessInfo {
                name: "firefox".into(),
                pid: 10,
                memory: 0,
                memory_percent: 12.34,
            },
            ProcessInfo {
                name: "code".into(),
                pid: 11,
                memory: 0,
                memory_percent: 5.0,
            },
        ];
        let text = format_processes(&procs, 230);
        assert!(text.contains("1. firefox (PID: 10) - 12.3% RAM"));
        assert!(text.contains("Celkový počet procesov: 230"));
    }

    #[tokio::test]
    async fn test_memory_command_reports() {
        let out = SystemTools.handle("pamäť RAM").await.unwrap();
        assert!(out.contains("Pamäť RAM"));
    }

    #[tokio::test]
    async fn test_generic_system_mention() {
        let out = SystemTools.handle("čo je to systém").await.unwrap();
        assert!(out.starts_with("ℹ️"));
    }
}
