//! Form fields and submission validation for the BackOffice console
//!
//! - [`FieldDescriptor`]: static field configuration (type, rules, options)
//! - [`Field`]: renders a descriptor into a control wrapped in its error scope
//! - [`FieldWrapper`]: the general renderer for custom elements, store-bound
//!   values, repeated fields and action slots
//! - [`FormValidation`]: the submit gate running every field's rules
//! - [`MemoryStore`]: a backend-less [`FieldStore`](backoffice_stores::FieldStore)
//!
//! ```
//! use backoffice_forms::{Field, FieldChange, FieldDescriptor, FormSnapshot, FormValidation, MemoryStore, RenderContext};
//! use backoffice_pages::{Event, View};
//! use backoffice_validators::RuleTable;
//! use std::rc::Rc;
//!
//! let store = MemoryStore::new();
//! let form = FormValidation::new(Rc::new(RuleTable::standard()), |_: FormSnapshot| {});
//! let ctx = RenderContext::new(&store, |_: FieldChange| {});
//! let title = FieldDescriptor::text("title", "Title").rule("required");
//!
//! let view = form.render(vec![Field::render(&title, &serde_json::Value::Null, &ctx)], View::empty());
//! let submit = Event::submit();
//! view.dispatch(&submit);
//!
//! assert!(submit.is_default_prevented());
//! assert_eq!(form.error_for("title").as_deref(), Some("This field is required."));
//! ```

pub mod context;
pub mod descriptor;
pub mod field;
pub mod memory;
pub mod options;
pub mod validation;
pub mod wrapper;

pub use context::{BuilderContext, FieldChange, RenderContext};
pub use descriptor::{
	DisabledPredicate, ElementType, FieldDescriptor, KeySelector, OptionLoader, OptionSource, ResolvedRule,
	RuleArg, RuleSpec,
};
pub use field::{Field, FieldRegistration, LOADING_TEXT, RenderedField};
pub use memory::MemoryStore;
pub use options::{ResolvedOptions, SelectOption, build_options, resolve_options};
pub use validation::{FormErrors, FormSnapshot, FormState, FormValidation};
pub use wrapper::{ActionSlot, ElementBuilder, FieldWrapper, Prop, WrapperChild};
