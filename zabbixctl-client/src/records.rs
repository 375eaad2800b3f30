//! Typed records returned by the facade
//!
//! Zabbix encodes nearly every number as a JSON string. Identifiers and
//! timestamps stay `String`s here; enumerations (severity, trigger value,
//! item type) are decoded from their codes, accepting both `"3"` and `3`,
//! and serialized back as the string code so records read their own output.
//! `Display` gives the human-readable names.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Numeric code that the server may send as a string or a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code(pub i64);

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Code(n)),
            Raw::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(Code)
                .map_err(|_| serde::de::Error::custom(format!("invalid numeric code '{}'", s))),
        }
    }
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Code(Code),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Code(Code(n)) => n != 0,
    })
}

/// The server sends `[]` instead of an object when a trigger has no event
fn deserialize_last_event<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<LastEvent>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Event(LastEvent),
        Empty(Vec<serde_json::Value>),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Event(event) => Some(event),
        Raw::Empty(_) | Raw::Null => None,
    })
}

/// Trigger severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "Code")]
pub enum Severity {
    NotClassified,
    Information,
    Warning,
    Average,
    High,
    Disaster,
}

impl From<Code> for Severity {
    fn from(code: Code) -> Self {
        match code.0 {
            1 => Severity::Information,
            2 => Severity::Warning,
            3 => Severity::Average,
            4 => Severity::High,
            n if n >= 5 => Severity::Disaster,
            _ => Severity::NotClassified,
        }
    }
}

impl Severity {
    /// Numeric code used in request filters such as `min_severity`
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::NotClassified => "not classified",
            Severity::Information => "information",
            Severity::Warning => "warning",
            Severity::Average => "average",
            Severity::High => "high",
            Severity::Disaster => "disaster",
        })
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Code(self.code()).serialize(serializer)
    }
}

/// Trigger state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Code")]
pub enum TriggerValue {
    #[default]
    Ok,
    Problem,
}

impl From<Code> for TriggerValue {
    fn from(code: Code) -> Self {
        if code.0 == 1 {
            TriggerValue::Problem
        } else {
            TriggerValue::Ok
        }
    }
}

impl fmt::Display for TriggerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TriggerValue::Ok => "OK",
            TriggerValue::Problem => "PROBLEM",
        })
    }
}

impl TriggerValue {
    pub fn code(self) -> i64 {
        match self {
            TriggerValue::Ok => 0,
            TriggerValue::Problem => 1,
        }
    }
}

impl Serialize for TriggerValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Code(self.code()).serialize(serializer)
    }
}

/// Item type, see the `type` property of the item object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "Code")]
pub enum ItemType {
    Agent,
    Trapper,
    SimpleCheck,
    Internal,
    AgentActive,
    Web,
    ExternalCheck,
    DatabaseMonitor,
    Ipmi,
    Ssh,
    Telnet,
    Calculated,
    Jmx,
    SnmpTrap,
    Dependent,
    HttpAgent,
    SnmpAgent,
    Script,
    Other(i64),
}

impl From<Code> for ItemType {
    fn from(code: Code) -> Self {
        match code.0 {
            0 => ItemType::Agent,
            2 => ItemType::Trapper,
            3 => ItemType::SimpleCheck,
            5 => ItemType::Internal,
            7 => ItemType::AgentActive,
            9 => ItemType::Web,
            10 => ItemType::ExternalCheck,
            11 => ItemType::DatabaseMonitor,
            12 => ItemType::Ipmi,
            13 => ItemType::Ssh,
            14 => ItemType::Telnet,
            15 => ItemType::Calculated,
            16 => ItemType::Jmx,
            17 => ItemType::SnmpTrap,
            18 => ItemType::Dependent,
            19 => ItemType::HttpAgent,
            20 => ItemType::SnmpAgent,
            21 => ItemType::Script,
            other => ItemType::Other(other),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemType::Agent => "agent",
            ItemType::Trapper => "trapper",
            ItemType::SimpleCheck => "check",
            ItemType::Internal => "internal",
            ItemType::AgentActive => "active",
            ItemType::Web => "web",
            ItemType::ExternalCheck => "external",
            ItemType::DatabaseMonitor => "dbmon",
            ItemType::Ipmi => "ipmi",
            ItemType::Ssh => "ssh",
            ItemType::Telnet => "telnet",
            ItemType::Calculated => "calc",
            ItemType::Jmx => "jmx",
            ItemType::SnmpTrap => "snmptrap",
            ItemType::Dependent => "dependent",
            ItemType::HttpAgent => "httpagent",
            ItemType::SnmpAgent => "snmpagent",
            ItemType::Script => "script",
            ItemType::Other(_) => "unknown",
        })
    }
}

impl ItemType {
    pub fn code(self) -> i64 {
        match self {
            ItemType::Agent => 0,
            ItemType::Trapper => 2,
            ItemType::SimpleCheck => 3,
            ItemType::Internal => 5,
            ItemType::AgentActive => 7,
            ItemType::Web => 9,
            ItemType::ExternalCheck => 10,
            ItemType::DatabaseMonitor => 11,
            ItemType::Ipmi => 12,
            ItemType::Ssh => 13,
            ItemType::Telnet => 14,
            ItemType::Calculated => 15,
            ItemType::Jmx => 16,
            ItemType::SnmpTrap => 17,
            ItemType::Dependent => 18,
            ItemType::HttpAgent => 19,
            ItemType::SnmpAgent => 20,
            ItemType::Script => 21,
            ItemType::Other(code) => code,
        }
    }
}

impl Serialize for ItemType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Code(self.code()).serialize(serializer)
    }
}

/// Host reference embedded by `selectHosts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostRef {
    #[serde(default)]
    pub hostid: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub name: String,
}

/// Host group (`hostgroup.get`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostGroup {
    pub groupid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<HostRef>,
}

/// Most recent event of a trigger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LastEvent {
    pub eventid: String,
    #[serde(default)]
    pub clock: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub acknowledged: bool,
}

/// Function of a trigger expression (`selectFunctions`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerFunction {
    #[serde(default)]
    pub functionid: String,
    #[serde(default)]
    pub itemid: String,
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub parameter: String,
}

/// Trigger (`trigger.get`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub triggerid: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expression: String,
    #[serde(default)]
    pub comments: String,
    pub priority: Severity,
    #[serde(default)]
    pub value: TriggerValue,
    #[serde(default)]
    pub lastchange: String,
    #[serde(default)]
    pub hosts: Vec<HostRef>,
    #[serde(default)]
    pub groups: Vec<HostGroup>,
    #[serde(
        rename = "lastEvent",
        default,
        deserialize_with = "deserialize_last_event"
    )]
    pub last_event: Option<LastEvent>,
    #[serde(default)]
    pub functions: Vec<TriggerFunction>,
}

impl Trigger {
    /// Last state change as unix time
    pub fn last_change(&self) -> Option<i64> {
        self.lastchange.parse().ok()
    }

    pub fn is_problem(&self) -> bool {
        self.value == TriggerValue::Problem
    }

    pub fn is_acknowledged(&self) -> bool {
        self.last_event.as_ref().is_some_and(|e| e.acknowledged)
    }

    /// Name of the first host the trigger belongs to
    pub fn host_name(&self) -> Option<&str> {
        self.hosts.first().map(|h| h.name.as_str())
    }
}

/// Host (`host.get`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub hostid: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub maintenance_status: String,
    #[serde(default)]
    pub maintenanceid: String,
    #[serde(default)]
    pub groups: Vec<HostGroup>,
}

impl Host {
    pub fn is_enabled(&self) -> bool {
        self.status == "0"
    }

    pub fn in_maintenance(&self) -> bool {
        self.maintenance_status == "1"
    }
}

/// Time period of a maintenance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimePeriod {
    #[serde(default)]
    pub timeperiodid: String,
    #[serde(default)]
    pub timeperiod_type: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub period: String,
}

/// Maintenance period (`maintenance.get`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Maintenance {
    pub maintenanceid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub maintenance_type: String,
    #[serde(default)]
    pub active_since: String,
    #[serde(default)]
    pub active_till: String,
    #[serde(default)]
    pub hosts: Vec<HostRef>,
    #[serde(default)]
    pub groups: Vec<HostGroup>,
    #[serde(default)]
    pub timeperiods: Vec<TimePeriod>,
}

/// Result of `maintenance.create`, `maintenance.update` and `maintenance.delete`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceIds {
    #[serde(default)]
    pub maintenanceids: Vec<String>,
}

/// Result of `host.delete`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostIds {
    #[serde(default)]
    pub hostids: Vec<String>,
}

/// Item (`item.get`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub itemid: String,
    #[serde(default)]
    pub hostid: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "key_", default)]
    pub key: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub value_type: String,
    #[serde(default)]
    pub lastvalue: String,
    #[serde(default)]
    pub lastclock: String,
    #[serde(default)]
    pub prevvalue: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hosts: Vec<HostRef>,
}

/// Step of a web scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpStep {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub no: String,
}

/// Web scenario (`httptest.get`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpTest {
    pub httptestid: String,
    #[serde(default)]
    pub hostid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub delay: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub steps: Vec<HttpStep>,
}

/// User (`user.get`, or embedded in a user group)
///
/// Servers before 5.4 call the login name `alias`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub userid: String,
    #[serde(default, alias = "alias")]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
}

/// User group (`usergroup.get`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserGroup {
    pub usrgrpid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gui_access: String,
    #[serde(default)]
    pub users_status: String,
    #[serde(default)]
    pub users: Vec<User>,
}

/// History value (`history.get`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub itemid: String,
    #[serde(default)]
    pub clock: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub ns: String,
}
