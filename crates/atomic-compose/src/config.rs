//! Startup configuration: declared components, entities and templates

use crate::component::{Component, ComponentArgs};
use crate::component_type::{ComponentType, View};
use crate::entity::EntityType;
use crate::factory::DEFAULT_ENTITY_VIEW;
use atomic_core::{AtomicError, Props, Result};
use atomic_schema::{PropRules, RuleDefinition};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// A configuration document
#[derive(Debug, Default, Deserialize)]
pub struct AtomicConfig {
    #[serde(default)]
    pub atomic: Settings,
    #[serde(default)]
    pub component: BTreeMap<String, ComponentDefinition>,
    #[serde(default)]
    pub entity: BTreeMap<String, EntityDefinition>,
    /// Template sources, keyed by view name, for renderers that want them
    #[serde(default)]
    pub template: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Unset means the factory default, [`DEFAULT_ENTITY_VIEW`]
    #[serde(default)]
    pub entity_view: Option<String>,
}

impl Settings {
    /// The configured entity view, or the default one
    pub fn entity_view(&self) -> &str {
        self.entity_view.as_deref().unwrap_or(DEFAULT_ENTITY_VIEW)
    }
}

/// Component type as it appears in configuration files
#[derive(Debug, Deserialize)]
pub struct ComponentDefinition {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub props: BTreeMap<String, RuleDefinition>,
}

/// Entity type as it appears in configuration files
#[derive(Debug, Deserialize)]
pub struct EntityDefinition {
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub actions: BTreeMap<String, NodeDefinition>,
}

/// One node of a declared tree.
///
/// `children` is kept as a raw table so the document order of child names
/// survives deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDefinition {
    #[serde(default)]
    pub props: Props,
    #[serde(default)]
    pub children: toml::Table,
    #[serde(default)]
    pub include: Vec<String>,
}

impl AtomicConfig {
    /// Load configuration from a TOML string
    pub fn load_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a directory structure
    ///
    /// Reads, in order and each optional:
    /// - `path/atomic.toml`
    /// - `path/components/*.toml`
    /// - `path/entities/*.toml`
    ///
    /// Later files override earlier definitions of the same name.
    pub fn load_from_directory<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::default();

        let main = path.join("atomic.toml");
        if main.exists() {
            config.merge(Self::load_from_file(&main)?);
        }

        for sub in ["components", "entities"] {
            let dir = path.join(sub);
            if !dir.exists() {
                continue;
            }
            let mut files: Vec<_> = fs::read_dir(&dir)?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<std::io::Result<_>>()?;
            files.sort();
            for file_path in files {
                if file_path.extension().map(|e| e == "toml").unwrap_or(false) {
                    config.merge(Self::load_from_file(&file_path)?);
                }
            }
        }

        Ok(config)
    }

    /// Merge another document into this one; the other side wins on conflicts
    pub fn merge(&mut self, other: AtomicConfig) {
        if other.atomic.entity_view.is_some() {
            self.atomic.entity_view = other.atomic.entity_view;
        }
        self.component.extend(other.component);
        self.entity.extend(other.entity);
        self.template.extend(other.template);
    }

    /// Build the declared component types
    pub fn component_types(&self) -> Result<Vec<(String, Arc<dyn ComponentType>)>> {
        self.component
            .iter()
            .map(|(name, def)| {
                let declared = DeclaredComponent::from_definition(name, def)?;
                Ok((name.clone(), Arc::new(declared) as Arc<dyn ComponentType>))
            })
            .collect()
    }

    /// Build the declared entity types
    pub fn entity_types(&self) -> Result<Vec<EntityType>> {
        self.entity
            .iter()
            .map(|(name, def)| declared_entity(name, def))
            .collect()
    }
}

/// A component type declared in configuration
#[derive(Debug, Clone)]
pub struct DeclaredComponent {
    pub name: String,
    pub description: Option<String>,
    pub view: Option<String>,
    pub rules: PropRules,
}

impl DeclaredComponent {
    pub fn from_definition(name: &str, def: &ComponentDefinition) -> Result<Self> {
        let rules = PropRules::from_definitions(def.props.clone()).map_err(|e| {
            AtomicError::Config(format!("component '{}': {}", name, e))
        })?;
        Ok(Self {
            name: name.to_string(),
            description: def.description.clone(),
            view: def.view.clone(),
            rules,
        })
    }
}

impl ComponentType for DeclaredComponent {
    fn rules(&self) -> PropRules {
        self.rules.clone()
    }

    fn view(&self, _component: &Component) -> View {
        match &self.view {
            Some(view) => View::Template(view.clone()),
            None => View::Composite,
        }
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A declared tree with children resolved into document order
#[derive(Debug, Clone, Default)]
pub struct NodeSpec {
    pub props: Props,
    pub children: Vec<(String, NodeSpec)>,
    pub include: Vec<String>,
}

impl NodeSpec {
    pub fn from_definition(def: NodeDefinition, path: &str) -> Result<Self> {
        let mut children = Vec::with_capacity(def.children.len());
        for (name, value) in def.children {
            let child_path = format!("{}.{}", path, name);
            let child: NodeDefinition = value.try_into().map_err(|e: toml::de::Error| {
                AtomicError::Config(format!("node '{}': {}", child_path, e))
            })?;
            children.push((name, NodeSpec::from_definition(child, &child_path)?));
        }
        Ok(Self {
            props: def.props,
            children,
            include: def.include,
        })
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.include.is_empty()
    }

    /// Add this node's children and includes to a component
    pub fn populate(&self, component: &Component) -> Result<()> {
        for (name, child) in &self.children {
            let args = ComponentArgs::new(child.props.clone());
            let args = if child.include.is_empty() && child.children.iter().all(|(_, c)| c.is_leaf()) {
                args.children(child.children.iter().map(|(n, c)| (n.clone(), c.props.clone())))
            } else {
                args.build(move |c| child.populate(c))
            };
            component.add_child_with(name, args)?;
        }

        for reference in &self.include {
            component.include(reference, None)?;
        }
        Ok(())
    }
}

fn declared_entity(name: &str, def: &EntityDefinition) -> Result<EntityType> {
    let mut ty = EntityType::new(name);
    if let Some(view) = &def.view {
        ty = ty.view(view.clone());
    }
    for (action, node) in &def.actions {
        let spec = NodeSpec::from_definition(node.clone(), &format!("{}@{}", name, action))?;
        ty = ty.action(action.clone(), move |root, _data| spec.populate(root));
    }
    Ok(ty)
}
