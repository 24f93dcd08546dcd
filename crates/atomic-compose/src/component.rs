//! Component tree nodes
//!
//! A [`Component`] is a cheap, clonable handle to one node of a tree. Parents
//! own their children; children only hold a weak back-link to their parent.

use crate::component_type::{Composite, ComponentType, View};
use crate::factory::Factory;
use crate::render::{ComponentContext, ViewRenderer};
use atomic_core::{from_value, AtomicError, Props, Result, Value};
use atomic_schema::PropRules;
use log::debug;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Callback that configures a freshly constructed component
pub type BuildFn<'a> = Box<dyn FnOnce(&Component) -> Result<()> + 'a>;

/// Children supplied when a component is constructed
pub enum Children<'a> {
    /// Invoked once with the new component
    Build(BuildFn<'a>),
    /// Child name to props, added in order
    Map(Vec<(String, Props)>),
}

/// Everything a component is constructed from
pub struct ComponentArgs<'a> {
    pub props: Props,
    pub children: Option<Children<'a>>,
}

impl<'a> ComponentArgs<'a> {
    pub fn new(props: Props) -> Self {
        Self {
            props,
            children: None,
        }
    }

    /// Configure the new component through a callback
    pub fn build(mut self, f: impl FnOnce(&Component) -> Result<()> + 'a) -> Self {
        self.children = Some(Children::Build(Box::new(f)));
        self
    }

    /// Add one child per entry, in iteration order
    pub fn children<N: Into<String>>(mut self, children: impl IntoIterator<Item = (N, Props)>) -> Self {
        self.children = Some(Children::Map(
            children.into_iter().map(|(name, props)| (name.into(), props)).collect(),
        ));
        self
    }
}

impl Default for ComponentArgs<'_> {
    fn default() -> Self {
        Self::new(Props::new())
    }
}

struct Node {
    name: String,
    ty: Arc<dyn ComponentType>,
    props: Props,
    children: Vec<Component>,
    parent: Option<Weak<RefCell<Node>>>,
    grafted: bool,
    factory: Factory,
}

/// Handle to a node in a component tree
#[derive(Clone)]
pub struct Component {
    node: Rc<RefCell<Node>>,
}

impl Component {
    fn from_parts(factory: Factory, name: String, ty: Arc<dyn ComponentType>, props: Props) -> Self {
        Self {
            node: Rc::new(RefCell::new(Node {
                name,
                ty,
                props,
                children: Vec::new(),
                parent: None,
                grafted: false,
                factory,
            })),
        }
    }

    /// An empty, unattached root of the [`Composite`] type
    pub(crate) fn root(factory: Factory) -> Self {
        Self::from_parts(factory, "root".to_string(), Arc::new(Composite), Props::new())
    }

    /// Construct an unattached component and apply its construction-time children
    pub(crate) fn construct(
        factory: Factory,
        name: &str,
        ty: Arc<dyn ComponentType>,
        args: ComponentArgs<'_>,
    ) -> Result<Self> {
        let component = Self::from_parts(factory, name.to_string(), ty, args.props);

        match args.children {
            Some(Children::Build(f)) => f(&component)?,
            Some(Children::Map(children)) => {
                for (child, props) in children {
                    component.add_child(&child, props)?;
                }
            }
            None => {}
        }

        Ok(component)
    }

    // --- props ---

    /// Get a prop by key
    pub fn get(&self, key: &str) -> Option<Value> {
        self.node.borrow().props.get(key).cloned()
    }

    /// Get a prop deserialized into a concrete type
    pub fn prop<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.node.borrow().props.get(key) {
            Some(value) => from_value(key, value).map(Some),
            None => Ok(None),
        }
    }

    /// Set a prop
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.node.borrow_mut().props.insert(key.into(), value.into());
        self
    }

    /// Set several props at once
    pub fn set_props(&self, props: Props) -> &Self {
        self.node.borrow_mut().props.extend(props);
        self
    }

    /// Determine if a prop has been set
    pub fn has(&self, key: &str) -> bool {
        self.node.borrow().props.contains_key(key)
    }

    /// Snapshot of all props
    pub fn properties(&self) -> Props {
        self.node.borrow().props.clone()
    }

    // --- composition ---

    /// Add a new child of the named type and return it
    pub fn add_child(&self, name: &str, props: Props) -> Result<Component> {
        self.add_child_with(name, ComponentArgs::new(props))
    }

    /// Add a new child of the named type, with construction-time children
    pub fn add_child_with(&self, name: &str, args: ComponentArgs<'_>) -> Result<Component> {
        let factory = self.factory();
        let ty = factory.components().resolve(name)?;
        let child = Component::construct(factory, name, ty, args)?;
        self.attach(&child)?;
        Ok(child)
    }

    /// Dispatch a method name to a registered component type.
    ///
    /// Equivalent to [`add_child`](Self::add_child), except that an
    /// unregistered name is reported as an undefined operation.
    pub fn call(&self, method: &str, props: Option<Props>) -> Result<Component> {
        if !self.factory().components().has(method) {
            return Err(AtomicError::UndefinedOperation(method.to_string()));
        }
        self.add_child(method, props.unwrap_or_default())
    }

    /// Execute another entity and attach its tree as a child.
    ///
    /// The included tree was validated by its own entity and is not
    /// validated again by the builder of this tree.
    pub fn include(&self, reference: &str, action: Option<&str>) -> Result<Component> {
        let mut entity = self.factory().make(reference, action)?;
        let included = entity.execute()?.component()?;

        included.node.borrow_mut().grafted = true;
        self.attach(&included)?;

        debug!("Included {} into {}", reference, self.name());
        Ok(included)
    }

    fn attach(&self, child: &Component) -> Result<()> {
        {
            let mut node = child.node.borrow_mut();
            if node.parent.is_some() {
                return Err(AtomicError::AlreadyAttached(node.name.clone()));
            }
            node.parent = Some(Rc::downgrade(&self.node));
        }
        self.node.borrow_mut().children.push(child.clone());
        Ok(())
    }

    // --- tree inspection ---

    /// The name this component was registered under
    pub fn name(&self) -> String {
        self.node.borrow().name.clone()
    }

    pub fn parent(&self) -> Option<Component> {
        self.node
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|node| Component { node })
    }

    /// Children in insertion order
    pub fn children(&self) -> Vec<Component> {
        self.node.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.node.borrow().children.len()
    }

    /// Number of ancestors above this component
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent();
        }
        depth
    }

    /// Whether both handles point to the same node
    pub fn ptr_eq(&self, other: &Component) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Whether this component is the root of an included entity tree
    pub fn is_grafted(&self) -> bool {
        self.node.borrow().grafted
    }

    pub fn component_type(&self) -> Arc<dyn ComponentType> {
        Arc::clone(&self.node.borrow().ty)
    }

    /// Rules declared by this component's type
    pub fn rules(&self) -> PropRules {
        self.component_type().rules()
    }

    pub fn factory(&self) -> Factory {
        self.node.borrow().factory.clone()
    }

    /// Indented dump of names and props, one component per line
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(0, &mut out);
        out
    }

    fn write_outline(&self, indent: usize, out: &mut String) {
        let node = self.node.borrow();
        out.push_str(&"  ".repeat(indent));
        out.push_str(&node.name);
        if !node.props.is_empty() {
            let props: Vec<String> = node.props.iter().map(|(k, v)| format!("{} = {}", k, v)).collect();
            out.push_str(&format!(" {{{}}}", props.join(", ")));
        }
        if node.grafted {
            out.push_str(" (included)");
        }
        out.push('\n');
        for child in &node.children {
            child.write_outline(indent + 1, out);
        }
    }

    // --- rendering ---

    /// Render this component through its view
    pub fn render(&self, renderer: &dyn ViewRenderer) -> Result<String> {
        let ty = self.component_type();
        match ty.view(self) {
            View::Template(name) => {
                let ctx = ComponentContext {
                    component: self,
                    properties: self.properties(),
                };
                renderer.render_component(&name, &ctx)
            }
            View::Markup(markup) => Ok(markup),
            View::Composite => self.render_children(renderer),
        }
    }

    /// Concatenate the output of every child, in order
    pub fn render_children(&self, renderer: &dyn ViewRenderer) -> Result<String> {
        let mut out = String::new();
        for child in self.children() {
            out.push_str(&child.render(renderer)?);
        }
        Ok(out)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("Component")
            .field("name", &node.name)
            .field("props", &node.props)
            .field("children", &node.children)
            .finish()
    }
}
