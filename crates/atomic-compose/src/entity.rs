//! Entities: units of execution that build one validated component tree

use crate::builder::Builder;
use crate::component::Component;
use crate::factory::Factory;
use crate::render::{EntityContext, ViewRenderer};
use atomic_core::{AtomicError, Props, Result, Value};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An action populates the root component from the entity data
pub type Action = Arc<dyn Fn(&Component, &Props) -> Result<()> + Send + Sync>;

/// A named set of actions that entities are made from
pub struct EntityType {
    name: String,
    view: Option<String>,
    actions: HashMap<String, Action>,
}

impl EntityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view: None,
            actions: HashMap::new(),
        }
    }

    /// Set the view used when rendering entities of this type
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Add an action
    pub fn action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&Component, &Props) -> Result<()> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    /// List all action names, sorted
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.name)
            .field("view", &self.view)
            .field("actions", &self.action_names())
            .finish()
    }
}

/// One execution of an entity action.
///
/// Data is added with [`with`](Self::with) before [`execute`](Self::execute)
/// runs the action exactly once; later calls return the same tree. Data added
/// after execution does not reach the built tree.
pub struct Entity {
    ty: Arc<EntityType>,
    action: String,
    data: Props,
    component: Option<Component>,
    validated: usize,
    executed: bool,
    factory: Factory,
}

impl Entity {
    pub(crate) fn new(factory: Factory, ty: Arc<EntityType>, action: String) -> Self {
        Self {
            ty,
            action,
            data: Props::new(),
            component: None,
            validated: 0,
            executed: false,
            factory,
        }
    }

    /// Add a piece of data
    pub fn with(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.warn_if_executed();
        self.data.insert(key.into(), value.into());
        self
    }

    /// Merge a map of data, later keys overwrite earlier ones
    pub fn with_data(&mut self, data: Props) -> &mut Self {
        self.warn_if_executed();
        self.data.extend(data);
        self
    }

    fn warn_if_executed(&self) {
        if self.executed {
            warn!(
                "Data added to {}@{} after execution has no effect on its tree",
                self.ty.name, self.action
            );
        }
    }

    pub fn data(&self) -> &Props {
        &self.data
    }

    /// Get a piece of data by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn entity_name(&self) -> &str {
        &self.ty.name
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Number of components validated when the tree was built
    pub fn validated_count(&self) -> usize {
        self.validated
    }

    /// Run the action on a fresh root and validate the resulting tree.
    ///
    /// A no-op once the entity has executed. When validation fails the
    /// entity keeps no tree and stays unexecuted.
    pub fn execute(&mut self) -> Result<&mut Self> {
        if self.executed {
            debug!("{}@{} already executed", self.ty.name, self.action);
            return Ok(self);
        }

        let action = self.ty.actions.get(&self.action).cloned().ok_or_else(|| {
            AtomicError::UnknownAction {
                entity: self.ty.name.clone(),
                action: self.action.clone(),
            }
        })?;

        debug!("Executing {}@{}", self.ty.name, self.action);

        let root = Component::root(self.factory.clone());
        action(&root, &self.data)?;

        let mut builder = Builder::new(self.factory.validator());
        builder.build(&root)?;

        self.validated = builder.visited();
        self.component = Some(root);
        self.executed = true;

        Ok(self)
    }

    /// The root of the built tree
    pub fn component(&self) -> Result<Component> {
        self.component.clone().ok_or(AtomicError::NotExecuted)
    }

    /// Render the entity, executing it first if needed.
    ///
    /// Without an explicit view the type's view is used, falling back to the
    /// factory's default entity view.
    pub fn render(&mut self, renderer: &dyn ViewRenderer, view: Option<&str>) -> Result<String> {
        self.execute()?;

        let view = view
            .map(str::to_string)
            .or_else(|| self.ty.view.clone())
            .unwrap_or_else(|| self.factory.entity_view().to_string());
        let component = self.component()?;

        let ctx = EntityContext {
            entity: &*self,
            component: &component,
            data: &self.data,
            validated: self.validated,
        };
        renderer.render_entity(&view, &ctx)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("entity", &self.ty.name)
            .field("action", &self.action)
            .field("data", &self.data)
            .field("executed", &self.executed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component_type::{ComponentType, View};
    use crate::render::ComponentContext;
    use atomic_core::props;
    use atomic_schema::{PropRules, PropType, RuleSpec};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Greeting;

    impl ComponentType for Greeting {
        fn rules(&self) -> PropRules {
            PropRules::new().with("name", RuleSpec::new(PropType::String).required())
        }

        fn view(&self, component: &Component) -> View {
            let name = component.prop::<String>("name").ok().flatten().unwrap_or_default();
            View::Markup(format!("Hello {}", name))
        }
    }

    /// Wraps entity output in its view name
    struct Wrapping;

    impl ViewRenderer for Wrapping {
        fn render_component(&self, view: &str, _ctx: &ComponentContext<'_>) -> Result<String> {
            Ok(view.to_string())
        }

        fn render_entity(&self, view: &str, ctx: &EntityContext<'_>) -> Result<String> {
            let inner = ctx.component.render(self)?;
            Ok(format!("[{}:{}:{}]", view, ctx.entity.action(), inner))
        }
    }

    fn make_factory(counter: Arc<AtomicUsize>) -> Factory {
        Factory::builder()
            .component("greeting", Greeting)
            .entity(
                EntityType::new("Welcome")
                    .action("show", move |root, data| {
                        counter.fetch_add(1, Ordering::SeqCst);
                        let name = data.get("name").cloned().unwrap_or_else(|| "nobody".into());
                        root.add_child("greeting", props! { "name" => name })?;
                        Ok(())
                    })
                    .action("broken", |root, _| {
                        root.add_child("greeting", Props::new())?;
                        Ok(())
                    }),
            )
            .entity(EntityType::new("Framed").view("frame").action("show", |_, _| Ok(())))
            .build()
    }

    #[test]
    fn test_execute_runs_action_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let factory = make_factory(counter.clone());
        let mut entity = factory.make("Welcome@show", None).unwrap();

        let first = entity.execute().unwrap().component().unwrap();
        let second = entity.execute().unwrap().component().unwrap();

        assert!(first.ptr_eq(&second));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(entity.is_executed());
        assert_eq!(entity.validated_count(), 2);
    }

    #[test]
    fn test_data_reaches_action() {
        let factory = make_factory(Arc::new(AtomicUsize::new(0)));
        let mut entity = factory.make("Welcome", Some("show")).unwrap();
        entity.with("name", "Ada").with_data(props! { "extra" => true });

        assert_eq!(entity.get("extra"), Some(&Value::Boolean(true)));

        let greeting = entity.execute().unwrap().component().unwrap().children()[0].clone();
        assert_eq!(greeting.get("name"), Some(Value::from("Ada")));
    }

    #[test]
    fn test_with_data_merges() {
        let factory = make_factory(Arc::new(AtomicUsize::new(0)));
        let mut entity = factory.make("Welcome@show", None).unwrap();
        entity
            .with_data(props! { "a" => 1i64, "b" => 2i64 })
            .with_data(props! { "b" => 3i64 });
        assert_eq!(entity.data(), &props! { "a" => 1i64, "b" => 3i64 });
    }

    #[test]
    fn test_failed_validation_leaves_no_tree() {
        let factory = make_factory(Arc::new(AtomicUsize::new(0)));
        let mut entity = factory.make("Welcome@broken", None).unwrap();

        assert!(matches!(
            entity.execute(),
            Err(AtomicError::PropValidation { component, .. }) if component == "greeting"
        ));
        assert!(!entity.is_executed());
        assert!(matches!(entity.component(), Err(AtomicError::NotExecuted)));
        assert!(matches!(
            entity.render(&Wrapping, None),
            Err(AtomicError::PropValidation { .. })
        ));
    }

    #[test]
    fn test_unknown_action() {
        let factory = make_factory(Arc::new(AtomicUsize::new(0)));
        let mut entity = factory.make("Welcome@hide", None).unwrap();
        assert!(matches!(
            entity.execute(),
            Err(AtomicError::UnknownAction { entity, action }) if entity == "Welcome" && action == "hide"
        ));
    }

    #[test]
    fn test_render_auto_executes() {
        let counter = Arc::new(AtomicUsize::new(0));
        let factory = make_factory(counter.clone());
        let mut entity = factory.make("Welcome@show", None).unwrap();
        entity.with("name", "Grace");

        assert_eq!(
            entity.render(&Wrapping, None).unwrap(),
            "[atomic::entity:show:Hello Grace]"
        );
        assert_eq!(
            entity.render(&Wrapping, Some("page")).unwrap(),
            "[page:show:Hello Grace]"
        );
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_render_context_carries_validated_count() {
        struct Summary;

        impl ViewRenderer for Summary {
            fn render_component(&self, view: &str, _ctx: &ComponentContext<'_>) -> Result<String> {
                Ok(view.to_string())
            }

            fn render_entity(&self, _view: &str, ctx: &EntityContext<'_>) -> Result<String> {
                Ok(format!("{} validated", ctx.validated))
            }
        }

        let factory = make_factory(Arc::new(AtomicUsize::new(0)));
        let mut entity = factory.make("Welcome@show", None).unwrap();
        assert_eq!(entity.render(&Summary, None).unwrap(), "2 validated");
    }

    #[test]
    fn test_entity_type_actions() {
        let factory = make_factory(Arc::new(AtomicUsize::new(0)));
        let ty = factory.entity_type("Welcome").unwrap();
        assert!(ty.has_action("show"));
        assert!(!ty.has_action("hide"));
        assert_eq!(ty.action_names(), vec!["broken", "show"]);
    }

    #[test]
    fn test_render_uses_type_view() {
        let factory = make_factory(Arc::new(AtomicUsize::new(0)));
        let mut entity = factory.make("Framed@show", None).unwrap();
        assert_eq!(entity.render(&Wrapping, None).unwrap(), "[frame:show:]");
    }
}
