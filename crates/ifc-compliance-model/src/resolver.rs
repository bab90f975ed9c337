// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity lookup

use crate::{Entity, EntityId, IfcType, ModelError};
use std::sync::Arc;

/// Lookup of entities by id and by type
///
/// `entities_by_type` must list entities in a stable order (document
/// order for snapshots): rule output order depends on it.
pub trait EntityResolver: Send + Sync {
    fn get(&self, id: EntityId) -> Option<Arc<Entity>>;

    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<Entity>>;

    /// Like `entities_by_type`, taking a name such as `"IFCDOOR"`
    fn find_by_type_name(&self, type_name: &str) -> Vec<Arc<Entity>> {
        let ifc_type = IfcType::parse(type_name);
        self.entities_by_type(&ifc_type)
    }

    fn count_by_type(&self, ifc_type: &IfcType) -> usize {
        self.entities_by_type(ifc_type).len()
    }

    /// Every entity id, in document order
    fn all_ids(&self) -> Vec<EntityId>;

    fn entity_count(&self) -> usize {
        self.all_ids().len()
    }
}

/// Convenience lookups available on every resolver
pub trait EntityResolverExt: EntityResolver {
    fn exists(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// `get`, with a miss turned into [`ModelError::EntityNotFound`]
    fn get_or_err(&self, id: EntityId) -> crate::Result<Arc<Entity>> {
        match self.get(id) {
            Some(entity) => Ok(entity),
            None => Err(ModelError::EntityNotFound(id)),
        }
    }
}

impl<R: EntityResolver + ?Sized> EntityResolverExt for R {}
