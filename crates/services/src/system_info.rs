//! Host information: OS, memory, disks, CPU, network, processes and battery.
//!
//! All functions block. Callers on an async runtime should go through
//! `tokio::task::spawn_blocking`.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::net::UdpSocket;
use std::path::Path;
use sysinfo::{Disks, Networks, System};

const GIB: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct OsInfo {
    pub name: String,
    pub version: String,
    pub kernel: String,
    pub arch: String,
    pub cpu_brand: String,
    pub host_name: String,
    pub user: String,
    pub working_dir: String,
}

#[derive(Debug, Clone, Copy)]
pub struct MemoryInfo {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

impl MemoryInfo {
    pub fn percent_used(&self) -> f64 {
        percent(self.used, self.total)
    }
}

#[derive(Debug, Clone)]
pub struct DiskInfo {
    pub mount_point: String,
    pub total: u64,
    pub available: u64,
}

impl DiskInfo {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.available)
    }

    pub fn percent_used(&self) -> f64 {
        percent(self.used(), self.total)
    }
}

#[derive(Debug, Clone)]
pub struct CpuInfo {
    pub usage_percent: f32,
    pub cores: usize,
    pub frequency_mhz: u64,
}

#[derive(Debug, Clone)]
pub struct NetworkInfo {
    pub host_name: String,
    pub local_ip: Option<String>,
    pub interfaces: Vec<InterfaceInfo>,
}

#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    pub name: String,
    pub mac: String,
    pub received: u64,
    pub transmitted: u64,
}

#[derive(Debug, Clone)]
pub struct ProcessInfo {
    pub name: String,
    pub pid: u32,
    pub memory: u64,
    pub memory_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChargeState {
    Charging,
    Discharging,
    Full,
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatteryInfo {
    pub percent: u8,
    pub state: ChargeState,
    /// Remaining seconds, when the platform reports it
    pub seconds_left: Option<u64>,
}

pub fn os_info() -> OsInfo {
    let mut sys = System::new();
    sys.refresh_cpu();
    let cpu_brand = sys
        .cpus()
        .first()
        .map(|c| c.brand().trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| "Neznámy".to_string());

    OsInfo {
        name: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
        version: System::os_version().unwrap_or_default(),
        kernel: System::kernel_version().unwrap_or_default(),
        arch: std::env::consts::ARCH.to_string(),
        cpu_brand,
        host_name: System::host_name().unwrap_or_default(),
        user: std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "neznámy".to_string()),
        working_dir: std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
    }
}

pub fn memory_info() -> MemoryInfo {
    let mut sys = System::new();
    sys.refresh_memory();
    MemoryInfo {
        total: sys.total_memory(),
        used: sys.used_memory(),
        available: sys.available_memory(),
    }
}

pub fn disk_info() -> Vec<DiskInfo> {
    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .map(|d| DiskInfo {
            mount_point: d.mount_point().display().to_string(),
            total: d.total_space(),
            available: d.available_space(),
        })
        .collect()
}

/// Samples CPU usage over `MINIMUM_CPU_UPDATE_INTERVAL`.
pub fn cpu_info() -> CpuInfo {
    let mut sys = System::new();
    sys.refresh_cpu();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu();

    CpuInfo {
        usage_percent: sys.global_cpu_info().cpu_usage(),
        cores: sys.cpus().len(),
        frequency_mhz: sys.cpus().first().map(|c| c.frequency()).unwrap_or(0),
    }
}

pub fn network_info() -> NetworkInfo {
    let networks = Networks::new_with_refreshed_list();
    let mut interfaces: Vec<InterfaceInfo> = networks
        .iter()
        .map(|(name, data)| InterfaceInfo {
            name: name.clone(),
            mac: data.mac_address().to_string(),
            received: data.total_received(),
            transmitted: data.total_transmitted(),
        })
        .collect();
    interfaces.sort_by(|a, b| a.name.cmp(&b.name));

    NetworkInfo {
        host_name: System::host_name().unwrap_or_default(),
        local_ip: local_ip(),
        interfaces,
    }
}

/// Address of the interface that routes to the internet. Connecting a UDP
/// socket sends nothing.
fn local_ip() -> Option<String> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|a| a.ip().to_string())
}

/// Processes sorted by resident memory, largest first, plus the total count.
pub fn top_processes(limit: usize) -> (Vec<ProcessInfo>, usize) {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.refresh_processes();
    let total_memory = sys.total_memory();

    let mut processes: Vec<ProcessInfo> = sys
        .processes()
        .iter()
        .map(|(pid, p)| ProcessInfo {
            name: p.name().to_string(),
            pid: pid.as_u32(),
            memory: p.memory(),
            memory_percent: percent(p.memory(), total_memory),
        })
        .collect();
    let count = processes.len();

    processes.sort_by(|a, b| b.memory.cmp(&a.memory));
    processes.truncate(limit);
    (processes, count)
}

/// Battery state. Only Linux exposes it without extra tooling.
pub fn battery_info() -> Result<Option<BatteryInfo>> {
    if cfg!(target_os = "linux") {
        read_linux_battery(Path::new("/sys/class/power_supply"))
    } else {
        Ok(None)
    }
}

fn read_linux_battery(root: &Path) -> Result<Option<BatteryInfo>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return Ok(None),
    };

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.starts_with("BAT") {
            continue;
        }
        let dir = entry.path();
        let capacity = fs::read_to_string(dir.join("capacity"))
            .with_context(|| format!("reading capacity of {}", name))?;
        let percent: u8 = capacity
            .trim()
            .parse()
            .map_err(|_| anyhow!("unexpected battery capacity '{}'", capacity.trim()))?;
        let status = fs::read_to_string(dir.join("status")).unwrap_or_default();

        let state = match status.trim() {
            "Charging" => ChargeState::Charging,
            "Discharging" => ChargeState::Discharging,
            "Full" => ChargeState::Full,
            _ => ChargeState::Unknown,
        };

        return Ok(Some(BatteryInfo {
            percent,
            state,
            seconds_left: seconds_left(&dir, state),
        }));
    }

    Ok(None)
}

/// Remaining runtime from energy_now / power_now (µWh / µW).
fn seconds_left(dir: &Path, state: ChargeState) -> Option<u64> {
    if state != ChargeState::Discharging {
        return None;
    }
    let read = |file: &str| -> Option<u64> {
        fs::read_to_string(dir.join(file))
            .ok()
            .and_then(|s| s.trim().parse().ok())
    };
    let energy = read("energy_now").or_else(|| read("charge_now"))?;
    let power = read("power_now").or_else(|| read("current_now"))?;
    if power == 0 {
        return None;
    }
    Some(energy * 3600 / power)
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Whole gibibytes, rounded down.
pub fn to_gib(bytes: u64) -> u64 {
    bytes / GIB
}
