//! Level builder - layers a flat command list by its dependencies

use crate::command::Command;
use crate::dependency::Dependency;
use crate::error::{Error, Result};
use crate::types::Level;
use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Group commands into a valid topological layering.
///
/// Each command lands in the first level after every command that provides
/// one of its requirements. Commands providing the same artifact run one
/// after another, in input order. A requirement no command provides must
/// already exist according to `is_present`. Input order is kept within a
/// level.
pub fn into_levels<P>(commands: Vec<Command>, is_present: P) -> Result<Vec<Level>>
where
    P: Fn(&Dependency) -> bool,
{
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(commands.len(), 0);
    let nodes: Vec<NodeIndex> = (0..commands.len()).map(|i| graph.add_node(i)).collect();

    // Writers of one artifact are chained so they never share a level.
    let mut providers: HashMap<&Dependency, Vec<usize>> = HashMap::new();
    for (index, command) in commands.iter().enumerate() {
        for dependency in command.provided() {
            let earlier = providers.entry(dependency).or_default();
            if let Some(&last) = earlier.last() {
                graph.update_edge(nodes[last], nodes[index], ());
            }
            earlier.push(index);
        }
    }

    for (index, command) in commands.iter().enumerate() {
        for dependency in command.required() {
            match providers.get(dependency) {
                Some(found) => {
                    // A command that also writes the artifact only waits for
                    // the writers before it.
                    let rewrites = command.provided().contains(dependency);
                    for &provider in found {
                        if provider == index || (rewrites && provider > index) {
                            continue;
                        }
                        graph.update_edge(nodes[provider], nodes[index], ());
                    }
                }
                None if is_present(dependency) => {}
                None => {
                    return Err(Error::Unsatisfied {
                        command: command.label(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }
    }

    let order = toposort(&graph, None).map_err(|_| cycle_error(&graph, &commands))?;

    let mut level_of = vec![0usize; commands.len()];
    for node in order {
        let level = graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|pred| level_of[graph[pred]] + 1)
            .max()
            .unwrap_or(0);
        level_of[graph[node]] = level;
    }

    let depth = level_of.iter().max().map_or(0, |deepest| deepest + 1);
    let mut levels: Vec<Level> = (0..depth).map(|_| Vec::new()).collect();
    for (command, level) in commands.into_iter().zip(level_of) {
        levels[level].push(command);
    }

    log::debug!("Layered commands into {} levels", levels.len());
    Ok(levels)
}

/// Every command caught in a cycle, in input order
fn cycle_error(graph: &DiGraph<usize, ()>, commands: &[Command]) -> Error {
    let mut members: Vec<usize> = tarjan_scc(graph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .flatten()
        .map(|node| graph[node])
        .collect();
    members.sort_unstable();

    Error::DependencyCycle {
        commands: members.into_iter().map(|i| commands[i].label()).collect(),
    }
}
