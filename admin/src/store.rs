//! Owner / admin / permission bookkeeping.
//!
//! Roles nest: the owner is always an admin, and admins always hold
//! permission. Explicit permission grants are tracked separately so they can
//! be migrated with [`PermissionStore::upgrade_me`].

use crate::error::AdminError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use svote_types::Principal;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PermissionStore {
    owner: Principal,
    emergency_admin: Option<Principal>,
    admins: BTreeSet<Principal>,
    permitted: BTreeSet<Principal>,
    locked_down: bool,
}

impl PermissionStore {
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            emergency_admin: None,
            admins: BTreeSet::new(),
            permitted: BTreeSet::new(),
            locked_down: false,
        }
    }

    pub fn with_emergency_admin(owner: Principal, emergency_admin: Principal) -> Self {
        let mut store = Self::new(owner);
        store.emergency_admin = Some(emergency_admin);
        store
    }

    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn emergency_admin(&self) -> Option<&Principal> {
        self.emergency_admin.as_ref()
    }

    pub fn is_owner(&self, who: &Principal) -> bool {
        self.owner == *who
    }

    pub fn is_admin(&self, who: &Principal) -> bool {
        self.is_owner(who) || self.admins.contains(who)
    }

    pub fn has_permission(&self, who: &Principal) -> bool {
        self.permitted.contains(who) || self.is_admin(who)
    }

    pub fn is_locked_down(&self) -> bool {
        self.locked_down
    }

    pub fn require_owner(&self, caller: &Principal) -> Result<(), AdminError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(AdminError::NotOwner(caller.clone()))
        }
    }

    pub fn require_admin(&self, caller: &Principal) -> Result<(), AdminError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(AdminError::NotAdmin(caller.clone()))
        }
    }

    pub fn require_permission(&self, caller: &Principal) -> Result<(), AdminError> {
        if self.has_permission(caller) {
            Ok(())
        } else {
            Err(AdminError::NoPermission(caller.clone()))
        }
    }

    /// Hand ownership to `new_owner`. Owner only; unaffected by lockdown.
    pub fn set_owner(&mut self, caller: &Principal, new_owner: Principal) -> Result<(), AdminError> {
        self.require_owner(caller)?;
        tracing::info!(from = %self.owner, to = %new_owner, "owner changed");
        self.owner = new_owner;
        Ok(())
    }

    /// Recovery path: the emergency admin may replace the owner.
    pub fn emergency_set_owner(
        &mut self,
        caller: &Principal,
        new_owner: Principal,
    ) -> Result<(), AdminError> {
        if self.emergency_admin.as_ref() != Some(caller) {
            return Err(AdminError::NotEmergencyAdmin(caller.clone()));
        }
        tracing::warn!(by = %caller, to = %new_owner, "emergency owner change");
        self.owner = new_owner;
        Ok(())
    }

    pub fn set_emergency_admin(
        &mut self,
        caller: &Principal,
        emergency_admin: Option<Principal>,
    ) -> Result<(), AdminError> {
        self.require_owner(caller)?;
        self.emergency_admin = emergency_admin;
        Ok(())
    }

    pub fn set_admin(
        &mut self,
        caller: &Principal,
        who: &Principal,
        enabled: bool,
    ) -> Result<(), AdminError> {
        self.require_owner(caller)?;
        self.require_unlocked()?;
        if enabled {
            self.admins.insert(who.clone());
        } else {
            self.admins.remove(who);
        }
        tracing::info!(admin = %who, enabled, "admin set");
        Ok(())
    }

    pub fn set_permission(
        &mut self,
        caller: &Principal,
        who: &Principal,
        enabled: bool,
    ) -> Result<(), AdminError> {
        self.require_admin(caller)?;
        self.require_unlocked()?;
        if enabled {
            self.permitted.insert(who.clone());
        } else {
            self.permitted.remove(who);
        }
        tracing::info!(principal = %who, enabled, "permission set");
        Ok(())
    }

    /// Move an explicit grant from `from` to `to` (admin only).
    pub fn upgrade_permission(
        &mut self,
        caller: &Principal,
        from: &Principal,
        to: &Principal,
    ) -> Result<(), AdminError> {
        self.require_admin(caller)?;
        self.require_unlocked()?;
        self.move_grant(from, to)
    }

    /// Move the caller's own explicit grant to `to`.
    ///
    /// Works after lockdown. The caller loses its grant, so it can do this once.
    pub fn upgrade_me(&mut self, caller: &Principal, to: &Principal) -> Result<(), AdminError> {
        self.move_grant(caller, to)
    }

    /// Freeze admin and permission changes for good. Owner only.
    pub fn lockdown(&mut self, caller: &Principal) -> Result<(), AdminError> {
        self.require_owner(caller)?;
        if !self.locked_down {
            tracing::warn!(by = %caller, "permissions locked down");
        }
        self.locked_down = true;
        Ok(())
    }

    fn move_grant(&mut self, from: &Principal, to: &Principal) -> Result<(), AdminError> {
        if !self.permitted.remove(from) {
            return Err(AdminError::NoPermission(from.clone()));
        }
        self.permitted.insert(to.clone());
        tracing::info!(from = %from, to = %to, "permission moved");
        Ok(())
    }

    fn require_unlocked(&self) -> Result<(), AdminError> {
        if self.locked_down {
            Err(AdminError::LockedDown)
        } else {
            Ok(())
        }
    }
}
