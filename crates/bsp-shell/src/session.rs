//! State held across shell commands.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use solid_bsp::{point, BspTree, Point, Rational, Solid, SolidRegistry};
use tracing::info;

use crate::command::{Command, CommandError};

pub const HELP: &str = "\
h                      show this help
q                      quit
new h w d              build a tree from an h x w x d lattice of unit cubes
cube x y z [dx dy dz]  insert a box with minimum corner (x, y, z)
loc x y z              locate the solid containing a point
rm id                  remove the solid with the given id
out                    print the tree, one leaf per line
ls                     list the solids known to the shell
cl                     clear the tree

Coordinates may be integers, fractions (1/3) or decimals (0.25).";

/// What the shell should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    Quit,
}

/// The tree plus everything needed to refer to its solids by id.
pub struct Session {
    tree: BspTree,
    registry: SolidRegistry,
    solids: BTreeMap<u64, Solid>,
    rng: StdRng,
}

impl Session {
    pub fn new(rng: StdRng) -> Self {
        Self {
            tree: BspTree::new(),
            registry: SolidRegistry::new(),
            solids: BTreeMap::new(),
            rng,
        }
    }

    pub fn tree(&self) -> &BspTree {
        &self.tree
    }

    /// Runs one command against the session.
    ///
    /// # Errors
    ///
    /// Tree errors are passed through; the tree is left as it was.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, CommandError> {
        let reply = match command {
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
            Command::New { h, w, d } => self.rebuild(h, w, d)?,
            Command::Cube { min, size } => self.add(min, size)?,
            Command::Locate(p) => self.locate(&p),
            Command::Remove(id) => self.remove(id)?,
            Command::Print => {
                if self.tree.is_empty() {
                    "(empty)".to_string()
                } else {
                    self.tree.print().trim_end().to_string()
                }
            }
            Command::List => self.list(),
            Command::Clear => {
                self.tree.clear();
                self.solids.clear();
                "Clearing BSP tree... Done.".to_string()
            }
        };
        Ok(Outcome::Reply(reply))
    }

    fn rebuild(&mut self, h: u32, w: u32, d: u32) -> Result<String, CommandError> {
        let mut cubes = Vec::new();
        for x in 0..h {
            for y in 0..w {
                for z in 0..d {
                    cubes.push(self.registry.unit_cube(point(x, y, z))?);
                }
            }
        }
        cubes.shuffle(&mut self.rng);

        let tree = BspTree::from_solids(cubes.clone())?;
        info!(
            solids = cubes.len(),
            nodes = tree.node_count(),
            depth = tree.depth(),
            "built lattice tree"
        );

        self.tree = tree;
        self.solids = cubes.into_iter().map(|c| (c.id().get(), c)).collect();
        Ok(format!(
            "Built tree of {} solids, depth {}.",
            self.solids.len(),
            self.tree.depth()
        ))
    }

    fn add(&mut self, min: Point, size: [Rational; 3]) -> Result<String, CommandError> {
        let solid = self.registry.cuboid(min, size)?;
        self.tree.insert(solid.clone())?;
        let id = solid.id();
        self.solids.insert(id.get(), solid);
        Ok(format!("Added solid {id}."))
    }

    fn locate(&self, p: &Point) -> String {
        match self.tree.locate(p) {
            Some(solid) => {
                let vertices: Vec<String> = solid.vertices().iter().map(format_point).collect();
                format!("Located in solid {}.\nvertices: {}", solid.id(), vertices.join(" "))
            }
            None => "Location failed!".to_string(),
        }
    }

    fn remove(&mut self, id: u64) -> Result<String, CommandError> {
        let solid = self.solids.get(&id).ok_or(CommandError::UnknownId(id))?;
        if self.tree.remove(solid) {
            self.solids.remove(&id);
            Ok(format!("Removed solid #{id}."))
        } else {
            Ok(format!("Cannot remove solid #{id}."))
        }
    }

    fn list(&self) -> String {
        if self.solids.is_empty() {
            return "(no solids)".to_string();
        }
        self.solids
            .values()
            .map(|solid| match solid.vertices().first() {
                // Cuboid vertices start at the minimum corner.
                Some(min) => format!("{}  min {}", solid.id(), format_point(min)),
                None => solid.id().to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn format_point(p: &Point) -> String {
    format!("({}, {}, {})", p.x, p.y, p.z)
}
