use super::Value;
use crate::Result;
use std::{cell::RefCell, fmt, rc::Rc};

type Loader = Rc<dyn Fn() -> Result<Value>>;

enum State {
    Pending(Loader),
    Loading,
    Resolved(Value),
}

/// A value that is computed on first access and memoized afterwards.
///
/// Lazily loaded relations are stored on their parent object as a
/// `Deferred`; reading the property through object access resolves it.
#[derive(Clone)]
pub struct Deferred(Rc<RefCell<State>>);

impl Deferred {
    pub fn new(loader: impl Fn() -> Result<Value> + 'static) -> Self {
        Self(Rc::new(RefCell::new(State::Pending(Rc::new(loader)))))
    }

    pub fn resolved(value: Value) -> Self {
        Self(Rc::new(RefCell::new(State::Resolved(value))))
    }

    pub fn is_resolved(&self) -> bool {
        matches!(&*self.0.borrow(), State::Resolved(_))
    }

    /// Runs the loader if it has not succeeded yet and returns the value.
    ///
    /// A failed load leaves the value pending, so the next call retries.
    pub fn resolve(&self) -> Result<Value> {
        // Take the loader out first; it may read other deferred values.
        let state = std::mem::replace(&mut *self.0.borrow_mut(), State::Loading);

        match state {
            State::Resolved(value) => {
                *self.0.borrow_mut() = State::Resolved(value.clone());
                Ok(value)
            }
            State::Pending(loader) => match loader() {
                Ok(value) => {
                    *self.0.borrow_mut() = State::Resolved(value.clone());
                    Ok(value)
                }
                Err(err) => {
                    *self.0.borrow_mut() = State::Pending(loader);
                    Err(err)
                }
            },
            State::Loading => crate::bail!("deferred value is already being loaded"),
        }
    }
}

impl PartialEq for Deferred {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow().as_deref() {
            Ok(State::Resolved(value)) => f.debug_tuple("Deferred").field(value).finish(),
            Ok(State::Pending(_)) => f.write_str("Deferred(<pending>)"),
            _ => f.write_str("Deferred(<loading>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn loader_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let deferred = Deferred::new(move || {
            counter.set(counter.get() + 1);
            Ok(Value::from("loaded"))
        });

        assert!(!deferred.is_resolved());
        assert_eq!(deferred.resolve().unwrap(), Value::from("loaded"));
        assert_eq!(deferred.clone().resolve().unwrap(), Value::from("loaded"));
        assert_eq!(calls.get(), 1);
        assert!(deferred.is_resolved());
    }

    #[test]
    fn failed_load_is_retried() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let deferred = Deferred::new(move || {
            counter.set(counter.get() + 1);
            if counter.get() == 1 {
                crate::bail!("storage unavailable");
            }
            Ok(Value::I64(7))
        });

        assert!(deferred.resolve().is_err());
        assert!(!deferred.is_resolved());
        assert_eq!(deferred.resolve().unwrap(), Value::I64(7));
        assert_eq!(calls.get(), 2);
    }
}
