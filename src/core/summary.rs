use crate::domain::model::Record;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortCount {
    pub port: u16,
    pub count: usize,
}

/// Unique addresses and port occurrence counts over a finished result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    unique_addresses: HashSet<String>,
    port_counts: HashMap<u16, usize>,
    first_seen: Vec<u16>,
}

impl Summary {
    /// Primary and secondary ports are counted independently, so a record
    /// can add to several buckets, or twice to the same one.
    pub fn from_records(records: &[Record]) -> Self {
        let mut summary = Self::default();
        for record in records {
            if let Some(ip) = &record.ip {
                summary.unique_addresses.insert(ip.clone());
            }
            if let Some(port) = record.port {
                summary.bump(port);
            }
            for port in record.ports.iter().flatten() {
                summary.bump(*port);
            }
        }
        summary
    }

    fn bump(&mut self, port: u16) {
        let count = self.port_counts.entry(port).or_insert(0);
        if *count == 0 {
            self.first_seen.push(port);
        }
        *count += 1;
    }

    pub fn unique_address_count(&self) -> usize {
        self.unique_addresses.len()
    }

    pub fn contains_address(&self, ip: &str) -> bool {
        self.unique_addresses.contains(ip)
    }

    pub fn port_count(&self, port: u16) -> usize {
        self.port_counts.get(&port).copied().unwrap_or(0)
    }

    /// Ports by descending count; ties keep first-seen order.
    pub fn ranked_ports(&self) -> Vec<PortCount> {
        let mut ranked: Vec<PortCount> = self
            .first_seen
            .iter()
            .map(|port| PortCount {
                port: *port,
                count: self.port_counts[port],
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}
