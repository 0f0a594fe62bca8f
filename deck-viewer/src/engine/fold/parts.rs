use bevy::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

/// Stable identifier for one paintable sub-mesh, assigned in traversal
/// order when the asset loads. Never derived from entity identity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartId(pub u32);

/// Current Euler XYZ rotation of a part, in radians. Animations write here
/// and the transform is derived from it, so values never round-trip through
/// a quaternion.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PartRotation(pub Vec3);

/// Rotation a part was authored with, captured once at load.
#[derive(Debug, Clone, PartialEq)]
pub struct PartOrientation {
    pub part: PartId,
    pub name: Option<String>,
    pub original_rotation: Vec3,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("orientation for part {0:?} was already captured")]
pub struct DuplicateCapture(pub PartId);

/// Per-part orientation snapshots for the live asset. Records can be added
/// once and then only read; a new asset gets a fresh map.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PartOrientations {
    records: BTreeMap<PartId, PartOrientation>,
}

impl PartOrientations {
    pub fn capture(
        &mut self,
        part: PartId,
        name: Option<String>,
        original_rotation: Vec3,
    ) -> Result<(), DuplicateCapture> {
        if self.records.contains_key(&part) {
            return Err(DuplicateCapture(part));
        }
        self.records.insert(
            part,
            PartOrientation {
                part,
                name,
                original_rotation,
            },
        );
        Ok(())
    }

    pub fn get(&self, part: PartId) -> Option<&PartOrientation> {
        self.records.get(&part)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
