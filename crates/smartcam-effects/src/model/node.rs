//! In-memory nodes, reactions, and actions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::host::{Action, Molecule, Node, NodeId, Reaction, VisionParameters};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A vision action: the node sees everything inside a cone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct See {
    /// Full aperture in degrees.
    pub angle_deg: f64,
    /// Visibility distance in world units.
    pub distance: f64,
}

impl See {
    /// Cone of `angle_deg` aperture reaching `distance`.
    pub fn new(angle_deg: f64, distance: f64) -> Self {
        Self {
            angle_deg,
            distance,
        }
    }
}

/// The actions known to the reference model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimAction {
    /// Field-of-view perception.
    See(See),
    /// One-shot heading initialization, angle in radians. Removed from its
    /// reaction once executed.
    InitHeading { angle: f64 },
    /// Move towards a random target: uniform direction, Lévy-distributed
    /// distance with the given `location` and `scale`.
    RandomTarget { location: f64, scale: f64 },
    /// Any other behaviour, kept only by name.
    Other(String),
}

impl Action for SimAction {
    fn name(&self) -> &str {
        match self {
            SimAction::See(_) => "see",
            SimAction::InitHeading { .. } => "init_heading",
            SimAction::RandomTarget { .. } => "random_target",
            SimAction::Other(name) => name,
        }
    }

    fn vision_parameters(&self) -> Option<VisionParameters> {
        match self {
            SimAction::See(see) => Some(VisionParameters {
                angle_deg: see.angle_deg,
                distance: see.distance,
            }),
            SimAction::InitHeading { .. }
            | SimAction::RandomTarget { .. }
            | SimAction::Other(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SimReaction
// ---------------------------------------------------------------------------

/// An ordered group of actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimReaction {
    actions: Vec<SimAction>,
}

impl SimReaction {
    /// A reaction with no actions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `action` and return the reaction.
    #[must_use]
    pub fn with_action(mut self, action: SimAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Append `action` after the existing ones.
    pub fn push(&mut self, action: SimAction) {
        self.actions.push(action);
    }

    /// Actions in execution order.
    pub fn sim_actions(&self) -> &[SimAction] {
        &self.actions
    }

    /// Keep only the actions for which `keep` returns `true`, in order.
    pub fn retain_actions(&mut self, keep: impl FnMut(&SimAction) -> bool) {
        self.actions.retain(keep);
    }
}

impl Reaction for SimReaction {
    fn actions(&self) -> Box<dyn Iterator<Item = &dyn Action> + '_> {
        Box::new(self.actions.iter().map(|a| a as &dyn Action))
    }
}

// ---------------------------------------------------------------------------
// SimNode
// ---------------------------------------------------------------------------

/// A node with a molecule set, reactions, and a physical diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimNode {
    id: NodeId,
    molecules: BTreeSet<Molecule>,
    reactions: Vec<SimReaction>,
    diameter: f64,
}

impl SimNode {
    /// A point-sized node with no molecules and no reactions.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            molecules: BTreeSet::new(),
            reactions: Vec::new(),
            diameter: 0.0,
        }
    }

    /// Add `molecule` and return the node.
    #[must_use]
    pub fn with_molecule(mut self, molecule: Molecule) -> Self {
        self.molecules.insert(molecule);
        self
    }

    /// Append `reaction` and return the node.
    #[must_use]
    pub fn with_reaction(mut self, reaction: SimReaction) -> Self {
        self.reactions.push(reaction);
        self
    }

    /// Set the physical diameter in world units.
    #[must_use]
    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = diameter;
        self
    }

    /// Returns `true` if the molecule was not already present.
    pub fn insert_molecule(&mut self, molecule: Molecule) -> bool {
        self.molecules.insert(molecule)
    }

    /// Returns `true` if the molecule was present.
    pub fn remove_molecule(&mut self, molecule: &Molecule) -> bool {
        self.molecules.remove(molecule)
    }

    /// Molecules in name order.
    pub fn molecules(&self) -> impl Iterator<Item = &Molecule> {
        self.molecules.iter()
    }

    pub fn sim_reactions(&self) -> &[SimReaction] {
        &self.reactions
    }

    /// Mutable reactions, for executing self-removing actions.
    pub fn sim_reactions_mut(&mut self) -> &mut [SimReaction] {
        &mut self.reactions
    }

    /// Physical diameter in world units.
    pub fn diameter(&self) -> f64 {
        self.diameter
    }
}

impl Node for SimNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn contains(&self, molecule: &Molecule) -> bool {
        self.molecules.contains(molecule)
    }

    fn reactions(&self) -> Box<dyn Iterator<Item = &dyn Reaction> + '_> {
        Box::new(self.reactions.iter().map(|r| r as &dyn Reaction))
    }
}
