//! Subcommands. Each one turns its flags into a [`RingConfig`] and leaves
//! all ring logic to `corelib`.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use corelib::{AnyRing, MigrationReport, Ownership, PartitionerKind, RingConfig, RingKind};
use tracing::{debug, info};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the owner of each key.
    Lookup(LookupArgs),
    /// Measure how many keys move when the cluster grows or shrinks.
    Migrate(MigrateArgs),
    /// Print vnode count and ring share per node.
    Inspect(InspectArgs),
}

/// Ring definition shared by `lookup` and `inspect`.
#[derive(Args, Debug)]
pub struct RingArgs {
    /// JSON ring config file.
    #[arg(
        long,
        conflicts_with_all = ["nodes", "weights", "replicas", "spot_budget", "partitioner"]
    )]
    pub config: Option<PathBuf>,

    /// Unweighted node names (weight 1 on a weighted ring).
    #[arg(long, value_delimiter = ',')]
    pub nodes: Vec<String>,

    /// Weighted nodes as name=weight; implies a weighted ring.
    #[arg(long, value_delimiter = ',', value_parser = parse_weight)]
    pub weights: Vec<(String, u32)>,

    /// Virtual nodes per node on a replica ring.
    #[arg(long)]
    pub replicas: Option<usize>,

    /// Spot budget per node; implies a weighted ring.
    #[arg(long)]
    pub spot_budget: Option<usize>,

    /// crc32, sha1-window, sip or xxh3.
    #[arg(long)]
    pub partitioner: Option<PartitionerKind>,
}

impl RingArgs {
    fn ring_config(&self) -> anyhow::Result<RingConfig> {
        if let Some(path) = &self.config {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return RingConfig::from_json(&json)
                .with_context(|| format!("loading {}", path.display()));
        }

        let weighted = !self.weights.is_empty() || self.spot_budget.is_some();
        let mut nodes: BTreeMap<String, u32> =
            self.nodes.iter().map(|name| (name.clone(), 1)).collect();
        nodes.extend(self.weights.iter().cloned());
        if nodes.is_empty() {
            bail!("no nodes given; pass --nodes, --weights or --config");
        }

        Ok(RingConfig {
            kind: if weighted {
                RingKind::Weighted
            } else {
                RingKind::Replica
            },
            replicas: self.replicas,
            spot_budget: self.spot_budget,
            partitioner: self.partitioner,
            nodes,
        })
    }

    fn build(&self) -> anyhow::Result<AnyRing> {
        let config = self.ring_config()?;
        debug!(?config, "building ring");
        Ok(config.build()?)
    }
}

fn parse_weight(s: &str) -> Result<(String, u32), String> {
    let (name, weight) = s.split_once('=')
        .ok_or_else(|| format!("expected name=weight, got `{}`", s))?;
    let weight = weight
        .parse::<u32>()
        .map_err(|e| format!("bad weight in `{}`: {}", s, e))?;
    Ok((name.to_string(), weight))
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    #[command(flatten)]
    pub ring: RingArgs,

    /// Keys to look up.
    #[arg(required = true)]
    pub keys: Vec<String>,
}

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Number of keys to sample ("0".."keys-1").
    #[arg(long, default_value_t = 1_000_000)]
    pub keys: usize,

    /// Node count of the old cluster.
    #[arg(long, default_value_t = 3)]
    pub nodes: usize,

    /// Node count of the new cluster.
    #[arg(long, default_value_t = 4)]
    pub new_nodes: usize,

    /// Virtual nodes per node on a replica ring.
    #[arg(long, default_value_t = 3)]
    pub replicas: usize,

    /// Use equally weighted nodes on a weighted ring instead.
    #[arg(long)]
    pub weighted: bool,

    #[arg(long)]
    pub partitioner: Option<PartitionerKind>,
}

impl MigrateArgs {
    fn cluster(&self, size: usize) -> anyhow::Result<AnyRing> {
        let nodes = (0..size).map(|i| (i.to_string(), 1)).collect();
        let config = if self.weighted {
            RingConfig {
                kind: RingKind::Weighted,
                partitioner: self.partitioner,
                nodes,
                ..RingConfig::default()
            }
        } else {
            RingConfig {
                kind: RingKind::Replica,
                replicas: Some(self.replicas),
                partitioner: self.partitioner,
                nodes,
                ..RingConfig::default()
            }
        };
        Ok(config.build()?)
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub ring: RingArgs,
}

/// Text produced by a command, one entry per output line.
#[derive(Debug, Default, PartialEq)]
pub struct CommandResult {
    pub lines: Vec<String>,
}

impl CommandResult {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl Command {
    pub fn run(&self) -> anyhow::Result<CommandResult> {
        let mut out = CommandResult::default();
        match self {
            Command::Lookup(args) => {
                let ring = args.ring.build()?;
                for key in &args.keys {
                    let owner = ring.get(key)
                        .map(|node| node.to_string())
                        .unwrap_or_else(|| "<none>".to_string());
                    out.push(format!("{}\t{}", key, owner));
                }
            }
            Command::Migrate(args) => {
                info!(
                    keys = args.keys,
                    nodes = args.nodes,
                    new_nodes = args.new_nodes,
                    "measuring migration"
                );
                let old = args.cluster(args.nodes)?;
                let new = args.cluster(args.new_nodes)?;
                let report =
                    MigrationReport::measure(&old, &new, (0..args.keys).map(|i| i.to_string()));
                out.push(format!(
                    "keys: {}, nodes: {}, new-nodes: {}",
                    args.keys, args.nodes, args.new_nodes
                ));
                out.push(report.to_string());
            }
            Command::Inspect(args) => {
                let ring = args.ring.build()?;
                let ownership = Ownership::of(&ring);
                out.push(format!(
                    "{} vnodes, partitioner {}",
                    ring.vnode_count(),
                    ring.partitioner_name()
                ));
                for share in ownership.iter() {
                    out.push(format!(
                        "{}\t{} vnodes\t{:.2}%",
                        share.node_id,
                        share.vnodes,
                        share.share() * 100.0
                    ));
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliConfig;
    use clap::Parser;

    fn run(args: &[&str]) -> anyhow::Result<CommandResult> {
        let argv = std::iter::once("hashring").chain(args.iter().copied());
        CliConfig::try_parse_from(argv)?.run()
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("a=3"), Ok(("a".to_string(), 3)));
        assert!(parse_weight("a").is_err());
        assert!(parse_weight("a=-1").is_err());
    }

    #[test]
    fn test_weighted_lookup_golden() {
        let out = run(&[
            "lookup",
            "--weights",
            "192.168.1.1=2,192.168.1.2=2,192.168.1.3=3",
            "--spot-budget",
            "100",
            "1",
            "2",
            "3",
        ])
        .unwrap();

        assert_eq!(
            out.lines,
            vec!["1\t192.168.1.3", "2\t192.168.1.3", "3\t192.168.1.2"]
        );
    }

    #[test]
    fn test_replica_lookup_single_node() {
        let out = run(&["lookup", "--nodes", "only", "x", "y"]).unwrap();
        assert_eq!(out.to_string(), "x\tonly\ny\tonly\n");
    }

    #[test]
    fn test_lookup_without_nodes_fails() {
        assert!(run(&["lookup", "key"]).is_err());
    }

    #[test]
    fn test_migrate_reports_ratio() {
        let args = ["migrate", "--keys", "1000", "--new-nodes", "3"];
        let out = run(&args).unwrap();
        assert_eq!(out.lines[0], "keys: 1000, nodes: 3, new-nodes: 3");
        assert_eq!(out.lines[1], "0/1000 keys moved (0.0000%)");
    }

    #[test]
    fn test_inspect_lists_every_node() {
        let args = ["inspect", "--weights", "a=1,b=3", "--spot-budget", "10"];
        let out = run(&args).unwrap();
        assert_eq!(out.lines.len(), 3);
        assert_eq!(
            out.lines[0],
            "20 vnodes, partitioner Sha1WindowPartitioner"
        );
        assert!(out.lines[1].starts_with("a\t5 vnodes\t"));
        assert!(out.lines[2].starts_with("b\t15 vnodes\t"));
    }

    #[test]
    fn test_config_conflicts_with_flags() {
        let args = ["inspect", "--config", "r.json", "--nodes", "a"];
        assert!(run(&args).is_err());
    }
}
