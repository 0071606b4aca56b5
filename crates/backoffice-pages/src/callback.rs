//! Cloneable callback wrapper.
//!
//! `Callback` wraps a closure in an `Rc` so it can be handed to several
//! views and stores while keeping one identity.
//!
//! ## Example
//!
//! ```
//! use backoffice_pages::Callback;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let count = Rc::new(Cell::new(0));
//! let increment = Callback::new({
//!     let count = Rc::clone(&count);
//!     move |by: i32| count.set(count.get() + by)
//! });
//!
//! increment.call(2);
//! increment.clone().call(3);
//! assert_eq!(count.get(), 5);
//! ```

use std::rc::Rc;

/// A cloneable callback.
///
/// ## Type Parameters
///
/// - `Args`: The argument type the callback receives
/// - `Ret`: The return type of the callback (defaults to `()`)
pub struct Callback<Args, Ret = ()> {
	inner: Rc<dyn Fn(Args) -> Ret + 'static>,
}

impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new Callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}

	/// Whether both callbacks wrap the same closure
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> std::fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<function>")
			.finish()
	}
}

impl<F, Args, Ret> From<F> for Callback<Args, Ret>
where
	F: Fn(Args) -> Ret + 'static,
{
	fn from(f: F) -> Self {
		Self::new(f)
	}
}
