//! Configuration Resolver
//!
//! Produces a single validated [`ProvisioningRequest`] from exactly one of
//! three input modes: a delimited batch string, guided prompting for the
//! mandatory field set, or full guided prompting including optional features.
//!
//! All three modes funnel through one parameterized field-prompt routine over
//! [`Field`]; each mode only differs in which fields it asks for.

use crate::config::request::{
    NfsExposure, OptionalFeatures, ProvisioningRequest, ShareAclEntry, DEFAULT_ACL_PERMISSION,
    DEFAULT_ACL_PRINCIPAL, DEFAULT_NFS_CLIENT_MATCH,
};
use crate::domain::ports::Prompter;
use crate::error::{Error, Result};
use tracing::debug;

/// Number of comma-separated fields a batch string must carry
pub const BATCH_FIELD_COUNT: usize = 13;

// =============================================================================
// Input Mode
// =============================================================================

/// How the provisioning request is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Single delimited string, non-interactive, optional features off
    Batch,
    /// Prompt for every mandatory field, no optional features
    GuidedMandatory,
    /// Prompt for all fields except the live-selected ones, plus features
    GuidedFull,
}

/// Resolve the input mode from flags, falling back to an operator prompt
///
/// A batch string forces non-interactive resolution regardless of the
/// interactive flag. The prompt loops until it gets one of the recognized
/// answers (case-insensitive `i`/`interactive`, `s`/`strict`, or empty for
/// the strict default).
pub fn resolve_mode<P: Prompter>(
    batch_supplied: bool,
    interactive: bool,
    prompter: &mut P,
) -> Result<InputMode> {
    if batch_supplied {
        return Ok(InputMode::Batch);
    }
    if interactive {
        return Ok(InputMode::GuidedFull);
    }

    loop {
        let answer =
            prompter.input("Provisioning mode: [i]nteractive or [s]trict (default: strict)")?;
        match answer.to_lowercase().as_str() {
            "" | "s" | "strict" => return Ok(InputMode::GuidedMandatory),
            "i" | "interactive" => return Ok(InputMode::GuidedFull),
            other => {
                debug!(answer = other, "unrecognized mode answer, re-prompting");
            }
        }
    }
}

// =============================================================================
// Fields
// =============================================================================

/// The thirteen logical fields of a provisioning request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Cluster,
    Tenant,
    Pool,
    Volume,
    VolumeSize,
    InterfaceName,
    InterfaceAddress,
    InterfaceNetmask,
    HomeNode,
    HomePort,
    ProtocolServer,
    DirectoryDomain,
    DnsServers,
}

impl Field {
    /// Positional order of fields in a batch string
    pub const BATCH_ORDER: [Field; BATCH_FIELD_COUNT] = [
        Field::Cluster,
        Field::Tenant,
        Field::Pool,
        Field::Volume,
        Field::VolumeSize,
        Field::InterfaceName,
        Field::InterfaceAddress,
        Field::InterfaceNetmask,
        Field::HomeNode,
        Field::HomePort,
        Field::ProtocolServer,
        Field::DirectoryDomain,
        Field::DnsServers,
    ];

    /// Fields prompted in Guided-Mandatory mode (everything)
    pub const GUIDED_MANDATORY: [Field; 13] = Field::BATCH_ORDER;

    /// Fields prompted in Guided-Full mode; pool and home node are deferred
    /// to the resource selector, which needs an open session
    pub const GUIDED_FULL: [Field; 11] = [
        Field::Cluster,
        Field::Tenant,
        Field::Volume,
        Field::VolumeSize,
        Field::InterfaceName,
        Field::InterfaceAddress,
        Field::InterfaceNetmask,
        Field::HomePort,
        Field::ProtocolServer,
        Field::DirectoryDomain,
        Field::DnsServers,
    ];

    /// Stable key used in error messages and flag names
    pub fn key(&self) -> &'static str {
        match self {
            Field::Cluster => "cluster",
            Field::Tenant => "tenant",
            Field::Pool => "pool",
            Field::Volume => "volume",
            Field::VolumeSize => "volume-size",
            Field::InterfaceName => "interface-name",
            Field::InterfaceAddress => "interface-address",
            Field::InterfaceNetmask => "interface-netmask",
            Field::HomeNode => "home-node",
            Field::HomePort => "home-port",
            Field::ProtocolServer => "protocol-server",
            Field::DirectoryDomain => "directory-domain",
            Field::DnsServers => "dns-servers",
        }
    }

    /// Prompt label shown to the operator
    pub fn label(&self) -> &'static str {
        match self {
            Field::Cluster => "Cluster management endpoint",
            Field::Tenant => "Tenant name",
            Field::Pool => "Storage pool",
            Field::Volume => "Data volume name",
            Field::VolumeSize => "Data volume size (e.g. 100g)",
            Field::InterfaceName => "Network interface name",
            Field::InterfaceAddress => "Network interface address",
            Field::InterfaceNetmask => "Network interface netmask",
            Field::HomeNode => "Interface home node",
            Field::HomePort => "Interface home port (e.g. e0c)",
            Field::ProtocolServer => "Protocol server name",
            Field::DirectoryDomain => "Directory domain",
            Field::DnsServers => "DNS servers (semicolon-separated)",
        }
    }
}

// =============================================================================
// Request Draft
// =============================================================================

/// Accumulates field values from flags, batch parsing, and prompting
///
/// Whitespace is trimmed on every set; an empty value leaves the field unset
/// so final validation can name it.
#[derive(Debug, Clone, Default)]
pub struct RequestDraft {
    pub cluster: Option<String>,
    pub tenant: Option<String>,
    pub pool: Option<String>,
    pub volume: Option<String>,
    pub volume_size: Option<String>,
    pub interface_name: Option<String>,
    pub interface_address: Option<String>,
    pub interface_netmask: Option<String>,
    pub home_node: Option<String>,
    pub home_port: Option<String>,
    pub protocol_server: Option<String>,
    pub directory_domain: Option<String>,
    pub dns_servers: Option<Vec<String>>,
    pub dns_search_domain: Option<String>,
}

impl RequestDraft {
    /// Whether a field already carries a value
    pub fn is_set(&self, field: Field) -> bool {
        match field {
            Field::Cluster => self.cluster.is_some(),
            Field::Tenant => self.tenant.is_some(),
            Field::Pool => self.pool.is_some(),
            Field::Volume => self.volume.is_some(),
            Field::VolumeSize => self.volume_size.is_some(),
            Field::InterfaceName => self.interface_name.is_some(),
            Field::InterfaceAddress => self.interface_address.is_some(),
            Field::InterfaceNetmask => self.interface_netmask.is_some(),
            Field::HomeNode => self.home_node.is_some(),
            Field::HomePort => self.home_port.is_some(),
            Field::ProtocolServer => self.protocol_server.is_some(),
            Field::DirectoryDomain => self.directory_domain.is_some(),
            Field::DnsServers => self.dns_servers.is_some(),
        }
    }

    /// Set a field from raw operator input
    ///
    /// The DNS server field is split on `;` with empty entries discarded.
    /// An empty or all-whitespace value leaves the field unset.
    pub fn set(&mut self, field: Field, raw: &str) {
        let value = raw.trim();
        if value.is_empty() {
            return;
        }
        match field {
            Field::Cluster => self.cluster = Some(value.to_string()),
            Field::Tenant => self.tenant = Some(value.to_string()),
            Field::Pool => self.pool = Some(value.to_string()),
            Field::Volume => self.volume = Some(value.to_string()),
            Field::VolumeSize => self.volume_size = Some(value.to_string()),
            Field::InterfaceName => self.interface_name = Some(value.to_string()),
            Field::InterfaceAddress => self.interface_address = Some(value.to_string()),
            Field::InterfaceNetmask => self.interface_netmask = Some(value.to_string()),
            Field::HomeNode => self.home_node = Some(value.to_string()),
            Field::HomePort => self.home_port = Some(value.to_string()),
            Field::ProtocolServer => self.protocol_server = Some(value.to_string()),
            Field::DirectoryDomain => self.directory_domain = Some(value.to_string()),
            Field::DnsServers => {
                let servers: Vec<String> = value
                    .split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                if !servers.is_empty() {
                    self.dns_servers = Some(servers);
                }
            }
        }
    }

    /// Keys of the given fields that are still unset
    pub fn missing(&self, fields: &[Field]) -> Vec<String> {
        fields
            .iter()
            .filter(|f| !self.is_set(**f))
            .map(|f| f.key().to_string())
            .collect()
    }

    /// Build the final request, failing if any of the thirteen fields is unset
    pub fn build(self, features: OptionalFeatures) -> Result<ProvisioningRequest> {
        let missing = self.missing(&Field::BATCH_ORDER);
        if !missing.is_empty() {
            return Err(Error::MissingFields { missing });
        }

        Ok(ProvisioningRequest {
            cluster: self.cluster.unwrap_or_default(),
            tenant: self.tenant.unwrap_or_default(),
            pool: self.pool.unwrap_or_default(),
            volume: self.volume.unwrap_or_default(),
            volume_size: self.volume_size.unwrap_or_default(),
            interface_name: self.interface_name.unwrap_or_default(),
            interface_address: self.interface_address.unwrap_or_default(),
            interface_netmask: self.interface_netmask.unwrap_or_default(),
            home_node: self.home_node.unwrap_or_default(),
            home_port: self.home_port.unwrap_or_default(),
            protocol_server: self.protocol_server.unwrap_or_default(),
            directory_domain: self.directory_domain.unwrap_or_default(),
            dns_servers: self.dns_servers.unwrap_or_default(),
            dns_search_domain: self.dns_search_domain,
            features,
        })
    }
}

// =============================================================================
// Batch Parsing
// =============================================================================

/// Parse a delimited batch string into a draft
///
/// Exactly [`BATCH_FIELD_COUNT`] comma-separated fields in the order of
/// [`Field::BATCH_ORDER`]; the last field splits on `;` into the DNS server
/// list. Any other field count is a hard configuration error raised before
/// any remote call.
pub fn parse_batch(input: &str) -> Result<RequestDraft> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.len() != BATCH_FIELD_COUNT {
        let order: Vec<&str> = Field::BATCH_ORDER.iter().map(|f| f.key()).collect();
        return Err(Error::Configuration(format!(
            "batch input has {} fields, expected {}: comma-separated {} \
             (DNS servers semicolon-separated)",
            parts.len(),
            BATCH_FIELD_COUNT,
            order.join(", "),
        )));
    }

    let mut draft = RequestDraft::default();
    for (field, part) in Field::BATCH_ORDER.iter().zip(parts) {
        draft.set(*field, part);
    }
    Ok(draft)
}

// =============================================================================
// Guided Prompting
// =============================================================================

/// Prompt for each listed field that was not already supplied
fn prompt_fields<P: Prompter>(
    draft: &mut RequestDraft,
    fields: &[Field],
    prompter: &mut P,
) -> Result<()> {
    for field in fields {
        if draft.is_set(*field) {
            debug!(field = field.key(), "field supplied, skipping prompt");
            continue;
        }
        let answer = prompter.input(field.label())?;
        draft.set(*field, &answer);
    }
    Ok(())
}

/// Prompt for the optional features reachable only in Guided-Full mode
///
/// Defaults are applied verbatim when the operator answers with an empty
/// string.
fn prompt_features<P: Prompter>(prompter: &mut P) -> Result<OptionalFeatures> {
    let nfs = if prompter.confirm("Also expose the volume over NFS?", false)? {
        let answer = prompter.input(&format!(
            "NFS export client match (default: {})",
            DEFAULT_NFS_CLIENT_MATCH
        ))?;
        let mut exposure = NfsExposure::default();
        if !answer.trim().is_empty() {
            exposure.client_match = answer.trim().to_string();
        }
        Some(exposure)
    } else {
        None
    };

    let share_acl = if prompter.confirm("Set an explicit access-control entry on the share?", false)?
    {
        let mut entry = ShareAclEntry::default();
        let principal = prompter.input(&format!(
            "ACL principal (default: {})",
            DEFAULT_ACL_PRINCIPAL
        ))?;
        if !principal.trim().is_empty() {
            entry.principal = principal.trim().to_string();
        }
        let permission = prompter.input(&format!(
            "ACL permission level (default: {})",
            DEFAULT_ACL_PERMISSION
        ))?;
        if !permission.trim().is_empty() {
            entry.permission = permission.trim().to_string();
        }
        Some(entry)
    } else {
        None
    };

    Ok(OptionalFeatures { nfs, share_acl })
}

// =============================================================================
// Resolution
// =============================================================================

/// Output of the resolver
#[derive(Debug)]
pub enum Resolution {
    /// All fields collected and validated; ready for the pipeline
    Complete(ProvisioningRequest),
    /// All fields except the live-selected ones; the resource selector must
    /// fill pool and home node against an open session
    NeedsSelection(PendingRequest),
}

impl Resolution {
    /// Cluster endpoint to connect to
    pub fn cluster(&self) -> &str {
        match self {
            Resolution::Complete(request) => &request.cluster,
            Resolution::NeedsSelection(pending) => pending.cluster(),
        }
    }
}

/// A request awaiting live resource selection for pool and home node
#[derive(Debug)]
pub struct PendingRequest {
    draft: RequestDraft,
    features: OptionalFeatures,
}

impl PendingRequest {
    pub fn cluster(&self) -> &str {
        // Validated non-empty before the resolver returns NeedsSelection.
        self.draft.cluster.as_deref().unwrap_or_default()
    }

    /// Storage pool, if it was supplied via flags and needs no selection
    pub fn pool(&self) -> Option<&str> {
        self.draft.pool.as_deref()
    }

    /// Home node, if it was supplied via flags and needs no selection
    pub fn home_node(&self) -> Option<&str> {
        self.draft.home_node.as_deref()
    }

    /// Fill the selected references and run final validation
    pub fn with_selected(mut self, pool: String, home_node: String) -> Result<ProvisioningRequest> {
        self.draft.pool = Some(pool);
        self.draft.home_node = Some(home_node);
        self.draft.build(self.features)
    }
}

/// Resolve a provisioning request from the selected mode
///
/// `supplied` carries any fields already given via flags; guided modes skip
/// prompting for those. Batch mode ignores `supplied` entirely — the batch
/// string is the whole configuration and optional features stay off.
pub fn resolve<P: Prompter>(
    supplied: RequestDraft,
    batch: Option<&str>,
    mode: InputMode,
    prompter: &mut P,
) -> Result<Resolution> {
    match mode {
        InputMode::Batch => {
            let batch = batch.ok_or_else(|| {
                Error::Configuration("batch mode selected without a batch string".into())
            })?;
            let mut draft = parse_batch(batch)?;
            draft.dns_search_domain = supplied.dns_search_domain;
            Ok(Resolution::Complete(draft.build(OptionalFeatures::default())?))
        }
        InputMode::GuidedMandatory => {
            let mut draft = supplied;
            prompt_fields(&mut draft, &Field::GUIDED_MANDATORY, prompter)?;
            Ok(Resolution::Complete(draft.build(OptionalFeatures::default())?))
        }
        InputMode::GuidedFull => {
            let mut draft = supplied;
            prompt_fields(&mut draft, &Field::GUIDED_FULL, prompter)?;

            // The non-deferred fields must be complete before a session is
            // opened; pool and home node are validated after selection.
            let missing = draft.missing(&Field::GUIDED_FULL);
            if !missing.is_empty() {
                return Err(Error::MissingFields { missing });
            }

            let features = prompt_features(prompter)?;
            Ok(Resolution::NeedsSelection(PendingRequest { draft, features }))
        }
    }
}
