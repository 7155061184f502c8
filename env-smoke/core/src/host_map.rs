// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Rank to host name, gathered once at startup and read-only afterward
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostMap {
    hosts: Vec<String>,
}

impl HostMap {
    /// Builds the map from host names gathered in rank order
    pub fn from_gathered(hosts: Vec<String>) -> Self {
        Self { hosts }
    }

    pub fn get(&self, rank: usize) -> Option<&str> {
        self.hosts.get(rank).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// Host name of this machine, from the environment
pub fn local_hostname() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "localhost".to_string())
}

/// Formats an output line tagged with the rank and, when known, its host
pub fn rank_line(host_map: Option<&HostMap>, rank: usize, msg: &str) -> String {
    match host_map.and_then(|hosts| hosts.get(rank)) {
        Some(host) => format!("{}: rnk={:4}: {}", host, rank, msg),
        None => format!("rnk={:4}: {}", rank, msg),
    }
}
