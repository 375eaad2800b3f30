//! Typed endpoint facade
//!
//! Every query merges a fixed set of default parameters with the caller's
//! `Params` (the caller wins on a key collision), makes an authenticated call
//! and decodes the result into typed records. An empty result, including the
//! `[]` the server sends for a mapping-shaped query without matches, becomes
//! an empty collection.
//!
//! # Membership updates
//!
//! `usergroup.update` replaces the whole member list. The facade reads the
//! members from the `UserGroup` values it is given, computes the new list and
//! sends it in full. Another actor changing the group between the read and the
//! write loses its change.

use crate::client::ZabbixClient;
use crate::records::{
    History, Host, HostGroup, HostIds, HttpTest, Item, Maintenance, MaintenanceIds, Trigger, User,
    UserGroup,
};
use serde_json::json;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use zabbixctl_core::{Error, Params, Result};

/// `event.acknowledge` action bitmask: acknowledge and add a message
pub const ACKNOWLEDGE_ACTION: i64 = 6;

/// Message attached to acknowledgements
pub const ACKNOWLEDGE_MESSAGE: &str = "ack";

fn trigger_defaults() -> Params {
    Params::new()
        .with("monitored", true)
        .with("selectHosts", json!(["name"]))
        .with("selectGroups", json!(["groupid", "name"]))
        .with("selectLastEvent", "extend")
        .with("selectFunctions", "extend")
        .with("expandExpression", true)
        .with("expandData", true)
        .with("expandDescription", true)
        .with("skipDependent", true)
        .with("preservekeys", true)
}

fn extend_output() -> Params {
    Params::new().with("output", "extend")
}

fn maintenance_defaults() -> Params {
    extend_output()
        .with("selectHosts", "extend")
        .with("selectGroups", "extend")
        .with("selectTimeperiods", "extend")
}

fn user_group_defaults() -> Params {
    extend_output().with("selectUsers", "extend")
}

fn history_defaults() -> Params {
    extend_output()
        .with("sortfield", "clock")
        .with("sortorder", "DESC")
}

/// Numeric ids in numeric order, anything else after them as text
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Member list with `user` appended unless already present
pub fn members_with(group: &UserGroup, user: &User) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(group.users.len() + 1);
    for member in &group.users {
        if !ids.contains(&member.userid) {
            ids.push(member.userid.clone());
        }
    }
    if !ids.contains(&user.userid) {
        ids.push(user.userid.clone());
    }
    ids
}

/// Member list with every occurrence of `user` removed
pub fn members_without(group: &UserGroup, user: &User) -> Vec<String> {
    group
        .users
        .iter()
        .filter(|member| member.userid != user.userid)
        .map(|member| member.userid.clone())
        .collect()
}

impl ZabbixClient {
    /// `trigger.get`, ordered by trigger id
    ///
    /// The server answers with an object keyed by trigger id
    /// (`preservekeys`), or with `[]` when nothing matches.
    pub async fn get_triggers(&self, params: Params) -> Result<Vec<Trigger>> {
        self.progress("retrieving triggers list");
        let params = trigger_defaults().merge(params);
        let keyed: BTreeMap<String, Trigger> = self.request("trigger.get", &params).await?;

        let mut triggers: Vec<Trigger> = keyed.into_values().collect();
        triggers.sort_by(|a, b| compare_ids(&a.triggerid, &b.triggerid));
        Ok(triggers)
    }

    /// `maintenance.get`
    pub async fn get_maintenances(&self, params: Params) -> Result<Vec<Maintenance>> {
        self.progress("retrieving maintenances list");
        self.request("maintenance.get", &maintenance_defaults().merge(params))
            .await
    }

    /// `maintenance.create`
    pub async fn create_maintenance(&self, params: Params) -> Result<MaintenanceIds> {
        self.progress("create maintenance period");
        self.request("maintenance.create", &params).await
    }

    /// `maintenance.update`
    pub async fn update_maintenance(&self, params: Params) -> Result<MaintenanceIds> {
        self.progress("update maintenance period");
        self.request("maintenance.update", &params).await
    }

    /// `maintenance.delete`; the ids are sent as a bare array
    pub async fn remove_maintenances<S: AsRef<str>>(&self, ids: &[S]) -> Result<MaintenanceIds> {
        self.progress("remove maintenance period");
        let ids: Vec<&str> = ids.iter().map(|id| id.as_ref()).collect();
        self.request("maintenance.delete", &ids).await
    }

    /// `item.get`
    pub async fn get_items(&self, params: Params) -> Result<Vec<Item>> {
        self.progress("retrieving items list");
        self.request("item.get", &extend_output().merge(params)).await
    }

    /// `httptest.get`
    pub async fn get_http_tests(&self, params: Params) -> Result<Vec<HttpTest>> {
        self.progress("retrieving web scenarios list");
        self.request("httptest.get", &extend_output().merge(params))
            .await
    }

    /// `usergroup.get`, members included
    pub async fn get_user_groups(&self, params: Params) -> Result<Vec<UserGroup>> {
        self.progress("retrieving usergroup list");
        self.request("usergroup.get", &user_group_defaults().merge(params))
            .await
    }

    /// `user.get`
    pub async fn get_users(&self, params: Params) -> Result<Vec<User>> {
        self.progress("retrieving user list");
        self.request("user.get", &extend_output().merge(params)).await
    }

    /// `host.get`
    pub async fn get_hosts(&self, params: Params) -> Result<Vec<Host>> {
        self.progress("retrieving host list");
        self.request("host.get", &extend_output().merge(params)).await
    }

    /// `host.delete`; the ids are sent as a bare array
    pub async fn remove_hosts<S: AsRef<str>>(&self, ids: &[S]) -> Result<HostIds> {
        self.progress("remove host list");
        let ids: Vec<&str> = ids.iter().map(|id| id.as_ref()).collect();
        self.request("host.delete", &ids).await
    }

    /// `hostgroup.get`
    pub async fn get_host_groups(&self, params: Params) -> Result<Vec<HostGroup>> {
        self.progress("retrieving hostgroup list");
        self.request("hostgroup.get", &extend_output().merge(params))
            .await
    }

    /// `history.get`, newest first
    pub async fn get_history(&self, params: Params) -> Result<Vec<History>> {
        self.progress("retrieving items history");
        self.request("history.get", &history_defaults().merge(params))
            .await
    }

    /// `event.acknowledge` with the fixed `ack` message
    pub async fn acknowledge<S: AsRef<str>>(&self, event_ids: &[S]) -> Result<()> {
        self.progress("acknowledging triggers");
        let event_ids: Vec<&str> = event_ids.iter().map(|id| id.as_ref()).collect();
        let params = Params::new()
            .with("action", ACKNOWLEDGE_ACTION)
            .with("eventids", json!(event_ids))
            .with("message", ACKNOWLEDGE_MESSAGE);

        self.call::<_, serde_json::Value>("event.acknowledge", &params)
            .await?;
        Ok(())
    }

    /// Add `user` to each group, one `usergroup.update` per group
    ///
    /// # Errors
    ///
    /// Stops at the first failing group and returns `Error::Membership`
    /// naming it; earlier groups stay updated.
    pub async fn add_user_to_groups(&self, groups: &[UserGroup], user: &User) -> Result<()> {
        for group in groups {
            self.progress(&format!(
                "adding user {} to group {}",
                user.username, group.name
            ));
            self.update_members(group, members_with(group, user)).await?;
        }
        Ok(())
    }

    /// Remove `user` from each group, one `usergroup.update` per group
    ///
    /// # Errors
    ///
    /// Stops at the first failing group and returns `Error::Membership`
    /// naming it.
    pub async fn remove_user_from_groups(&self, groups: &[UserGroup], user: &User) -> Result<()> {
        for group in groups {
            self.progress(&format!(
                "removing user {} from group {}",
                user.username, group.name
            ));
            self.update_members(group, members_without(group, user))
                .await?;
        }
        Ok(())
    }

    async fn update_members(&self, group: &UserGroup, userids: Vec<String>) -> Result<()> {
        let params = Params::new()
            .with("usrgrpid", group.usrgrpid.as_str())
            .with("userids", json!(userids));

        self.call::<_, serde_json::Value>("usergroup.update", &params)
            .await
            .map_err(|e| Error::Membership {
                group: group.name.clone(),
                source: Box::new(e),
            })?;
        Ok(())
    }
}
