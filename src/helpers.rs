use std::fmt;

use convert_case::{Case, Casing};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::sync::SyncError;

const GENERIC_BLOCK: &str = r#"// Helper types for easier usage
export type Tables<T extends keyof Database["public"]["Tables"]> = Database["public"]["Tables"][T]["Row"]
export type TablesInsert<T extends keyof Database["public"]["Tables"]> = Database["public"]["Tables"][T]["Insert"]
export type TablesUpdate<T extends keyof Database["public"]["Tables"]> = Database["public"]["Tables"][T]["Update"]
export type Enums<T extends keyof Database["public"]["Enums"]> = Database["public"]["Enums"][T]
"#;

/// Names declared by `GENERIC_BLOCK`.
const GENERIC_NAMES: &[&str] = &["Tables", "TablesInsert", "TablesUpdate", "Enums"];

const DEFAULT_TABLES: &[(&str, &str)] = &[
    ("User", "users"),
    ("Chip", "chips"),
    ("Company", "companies"),
    ("Lead", "leads"),
    ("Scan", "scans"),
    ("CampaignOverride", "campaign_overrides"),
    ("WebhookLog", "webhook_logs"),
    ("ProfileTemplate", "profile_templates"),
];

const DEFAULT_ENUMS: &[(&str, &str)] = &[
    ("ChipMode", "chip_mode"),
    ("PlanType", "plan_type"),
    ("SentimentType", "sentiment_type"),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AliasKind {
    Table,
    Enum,
}

impl AliasKind {
    fn accessor(self) -> &'static str {
        match self {
            AliasKind::Table => "Tables",
            AliasKind::Enum => "Enums",
        }
    }
}

/// A single `export type <alias> = Tables<"<name>">` style line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    alias: String,
    name: String,
    kind: AliasKind,
}

type AliasList = SmallVec<[Alias; 16]>;

impl Alias {
    /// Parses `name` or `Alias=name`. Without an explicit alias, tables get the
    /// singular PascalCase of their name and enums the plain PascalCase.
    pub fn parse(spec: &str, kind: AliasKind) -> Result<Self, SyncError> {
        let (alias, name) = match spec.split_once('=') {
            Some((alias, name)) => (alias.trim().to_string(), name.trim()),
            None => {
                let name = spec.trim();
                let alias = match kind {
                    AliasKind::Table => singular(name).to_case(Case::Pascal),
                    AliasKind::Enum => name.to_case(Case::Pascal),
                };
                (alias, name)
            }
        };

        if !is_identifier(&alias) || !is_identifier(name) {
            return Err(SyncError::InvalidAlias(spec.to_string()));
        }

        Ok(Self {
            alias,
            name: name.to_string(),
            kind,
        })
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "export type {} = {}<\"{}\">",
            self.alias,
            self.kind.accessor(),
            self.name
        )
    }
}

fn singular(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        return format!("{stem}y");
    }

    if name.ends_with("ss") {
        return name.to_string();
    }

    name.strip_suffix('s').unwrap_or(name).to_string()
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The built-in aliases of one kind, as `Alias=name` specs.
pub fn default_specs(kind: AliasKind) -> Vec<String> {
    let defaults = match kind {
        AliasKind::Table => DEFAULT_TABLES,
        AliasKind::Enum => DEFAULT_ENUMS,
    };

    defaults
        .iter()
        .map(|(alias, name)| format!("{alias}={name}"))
        .collect()
}

/// The block appended after the generated database types. Rendering it with
/// `Display` yields the exact text that follows the separating newline.
#[derive(Debug, Clone)]
pub struct Helpers {
    tables: AliasList,
    enums: AliasList,
}

impl Helpers {
    /// The built-in table and enum aliases.
    pub fn standard() -> Result<Self, SyncError> {
        Self::from_specs(
            &default_specs(AliasKind::Table),
            &default_specs(AliasKind::Enum),
        )
    }

    pub fn from_specs<T, E>(tables: &[T], enums: &[E]) -> Result<Self, SyncError>
    where
        T: AsRef<str>,
        E: AsRef<str>,
    {
        let tables = tables
            .iter()
            .map(|spec| Alias::parse(spec.as_ref(), AliasKind::Table))
            .collect::<Result<AliasList, _>>()?;
        let enums = enums
            .iter()
            .map(|spec| Alias::parse(spec.as_ref(), AliasKind::Enum))
            .collect::<Result<AliasList, _>>()?;

        // every alias lands in the same TypeScript module scope
        let mut seen: FxHashSet<&str> = GENERIC_NAMES.iter().copied().collect();
        for alias in tables.iter().chain(enums.iter()) {
            if !seen.insert(alias.alias.as_str()) {
                return Err(SyncError::DuplicateAlias(alias.alias.clone()));
            }
            tracing::trace!(alias = alias.alias(), name = alias.name(), "helper alias");
        }

        Ok(Self { tables, enums })
    }

    pub fn tables(&self) -> &[Alias] {
        &self.tables
    }

    pub fn enums(&self) -> &[Alias] {
        &self.enums
    }
}

impl fmt::Display for Helpers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        f.write_str(GENERIC_BLOCK)?;

        if self.tables.is_empty() && self.enums.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "// Convenience types")?;
        for alias in &self.tables {
            writeln!(f, "{alias}")?;
        }

        if self.enums.is_empty() {
            return Ok(());
        }

        if !self.tables.is_empty() {
            writeln!(f)?;
        }
        for alias in &self.enums {
            writeln!(f, "{alias}")?;
        }

        Ok(())
    }
}
