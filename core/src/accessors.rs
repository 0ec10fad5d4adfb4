//! Typed accessor trampolines
//!
//! Macro-generated code hands typed function pointers to the descriptor
//! builders; these helpers erase them behind `dyn Any` so the registry can
//! store one closure shape per accessor kind. The downcast to the declaring
//! type happens once per call, nothing is resolved by name at call time.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::AccessError;
use crate::model::{Getter, Invoker, Setter};
use crate::types::{DebugData, DebugValue};

fn downcast_ref<T: Any>(instance: &dyn Any) -> Result<&T, AccessError> {
    instance
        .downcast_ref::<T>()
        .ok_or(AccessError::InstanceType {
            expected: std::any::type_name::<T>(),
        })
}

fn downcast_mut<T: Any>(instance: &mut dyn Any) -> Result<&mut T, AccessError> {
    instance
        .downcast_mut::<T>()
        .ok_or(AccessError::InstanceType {
            expected: std::any::type_name::<T>(),
        })
}

fn unbox<V: DebugData>(value: &DebugValue) -> Result<V, AccessError> {
    V::from_debug_value(value).ok_or(AccessError::ValueType {
        expected: V::value_type(),
        found: value.value_type(),
    })
}

/// `(instance) -> instance.field`
pub fn field_getter<T: Any, V: DebugData>(field: fn(&T) -> &V) -> Getter {
    Arc::new(move |instance: &dyn Any| -> Result<DebugValue, AccessError> {
        let this = downcast_ref::<T>(instance)?;
        Ok(field(this).to_debug_value())
    })
}

/// `(instance, value) -> instance.field = value`
pub fn field_setter<T: Any, V: DebugData>(field: fn(&mut T) -> &mut V) -> Setter {
    Arc::new(move |instance: &mut dyn Any, value: DebugValue| -> Result<(), AccessError> {
        let value = unbox::<V>(&value)?;
        let this = downcast_mut::<T>(instance)?;
        *field(this) = value;
        Ok(())
    })
}

/// `(instance) -> instance.property()`
pub fn property_getter<T: Any, V: DebugData>(get: fn(&T) -> V) -> Getter {
    Arc::new(move |instance: &dyn Any| -> Result<DebugValue, AccessError> {
        let this = downcast_ref::<T>(instance)?;
        Ok(get(this).to_debug_value())
    })
}

/// `(instance, value) -> instance.set_property(value)`
pub fn property_setter<T: Any, V: DebugData>(set: fn(&mut T, V)) -> Setter {
    Arc::new(move |instance: &mut dyn Any, value: DebugValue| -> Result<(), AccessError> {
        let value = unbox::<V>(&value)?;
        let this = downcast_mut::<T>(instance)?;
        set(this, value);
        Ok(())
    })
}

/// `(instance, value) -> instance.try_set_property(value)`
///
/// The setter may reject the value; its error is returned as
/// [`AccessError::Rejected`].
pub fn property_fallible_setter<T: Any, V: DebugData>(
    set: fn(&mut T, V) -> Result<(), AccessError>,
) -> Setter {
    Arc::new(move |instance: &mut dyn Any, value: DebugValue| -> Result<(), AccessError> {
        let value = unbox::<V>(&value)?;
        let this = downcast_mut::<T>(instance)?;
        set(this, value)
    })
}

/// Return values a property setter may have
pub trait SetterOutcome {
    fn into_access_result(self) -> Result<(), AccessError>;
}

impl SetterOutcome for () {
    fn into_access_result(self) -> Result<(), AccessError> {
        Ok(())
    }
}

impl<E: fmt::Display> SetterOutcome for Result<(), E> {
    fn into_access_result(self) -> Result<(), AccessError> {
        self.map_err(|err| AccessError::Rejected(err.to_string()))
    }
}

/// `(instance, args) -> instance.method(args[0], ...)`
///
/// The argument count is checked before the call; `call` converts each
/// argument with [`argument`].
pub fn method_invoker<T: Any>(
    arity: usize,
    call: fn(&mut T, &[DebugValue]) -> Result<DebugValue, AccessError>,
) -> Invoker {
    Arc::new(
        move |instance: &mut dyn Any, args: &[DebugValue]| -> Result<DebugValue, AccessError> {
            if args.len() != arity {
                return Err(AccessError::ArgumentCount {
                    expected: arity,
                    found: args.len(),
                });
            }
            let this = downcast_mut::<T>(instance)?;
            call(this, args)
        },
    )
}

/// Convert argument `index` to the parameter type
pub fn argument<V: DebugData>(args: &[DebugValue], index: usize) -> Result<V, AccessError> {
    let value = args.get(index).ok_or(AccessError::ArgumentCount {
        expected: index + 1,
        found: args.len(),
    })?;
    V::from_debug_value(value).ok_or(AccessError::Argument {
        index,
        expected: V::value_type(),
        found: value.value_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValueType;

    struct Crate {
        weight: f32,
        label: String,
    }

    impl Crate {
        fn weight(&self) -> f32 {
            self.weight
        }

        fn set_weight(&mut self, weight: f32) {
            self.weight = weight;
        }

        fn stack(&mut self, count: i32, label: String) -> f32 {
            self.label = label;
            self.weight * count as f32
        }
    }

    fn new_crate() -> Crate {
        Crate {
            weight: 2.0,
            label: String::new(),
        }
    }

    #[test]
    fn test_field_accessors() {
        let get = field_getter::<Crate, f32>(|c| &c.weight);
        let set = field_setter::<Crate, f32>(|c| &mut c.weight);
        let mut target = new_crate();

        set(&mut target, DebugValue::F32(7.5)).unwrap();
        assert_eq!(get(&target).unwrap(), DebugValue::F32(7.5));
    }

    #[test]
    fn test_setter_rejects_wrong_value_type() {
        let set = field_setter::<Crate, f32>(|c| &mut c.weight);
        let mut target = new_crate();

        let err = set(&mut target, DebugValue::I32(3)).unwrap_err();
        assert_eq!(
            err,
            AccessError::ValueType {
                expected: ValueType::F32,
                found: ValueType::I32
            }
        );
        assert_eq!(target.weight, 2.0);
    }

    #[test]
    fn test_getter_rejects_wrong_instance() {
        let get = property_getter::<Crate, f32>(Crate::weight);
        let err = get(&42u8).unwrap_err();
        assert!(matches!(err, AccessError::InstanceType { .. }));
    }

    #[test]
    fn test_property_accessors() {
        let get = property_getter::<Crate, f32>(Crate::weight);
        let set = property_setter::<Crate, f32>(Crate::set_weight);
        let mut target = new_crate();

        set(&mut target, DebugValue::F32(4.0)).unwrap();
        assert_eq!(get(&target).unwrap(), DebugValue::F32(4.0));
    }

    fn try_set_weight(this: &mut Crate, weight: f32) -> Result<(), AccessError> {
        let outcome: Result<(), String> = if weight < 0.0 {
            Err(format!("weight {weight} is negative"))
        } else {
            this.weight = weight;
            Ok(())
        };
        outcome.into_access_result()
    }

    #[test]
    fn test_fallible_setter_reports_rejection() {
        let set = property_fallible_setter::<Crate, f32>(try_set_weight);
        let mut target = new_crate();

        set(&mut target, DebugValue::F32(5.0)).unwrap();
        assert_eq!(target.weight, 5.0);

        assert_eq!(
            set(&mut target, DebugValue::F32(-1.0)),
            Err(AccessError::Rejected("weight -1 is negative".to_string()))
        );
        assert_eq!(target.weight, 5.0);
        assert_eq!(().into_access_result(), Ok(()));
    }

    fn invoke_stack(this: &mut Crate, args: &[DebugValue]) -> Result<DebugValue, AccessError> {
        let count = argument::<i32>(args, 0)?;
        let label = argument::<String>(args, 1)?;
        Ok(this.stack(count, label).to_debug_value())
    }

    #[test]
    fn test_method_invoker() {
        let invoke = method_invoker::<Crate>(2, invoke_stack);
        let mut target = new_crate();

        let result = invoke(
            &mut target,
            &[DebugValue::I32(3), DebugValue::String("heavy".into())],
        )
        .unwrap();
        assert_eq!(result, DebugValue::F32(6.0));
        assert_eq!(target.label, "heavy");
    }

    #[test]
    fn test_method_invoker_checks_arguments() {
        let invoke = method_invoker::<Crate>(2, invoke_stack);
        let mut target = new_crate();

        let err = invoke(&mut target, &[DebugValue::I32(3)]).unwrap_err();
        assert_eq!(
            err,
            AccessError::ArgumentCount {
                expected: 2,
                found: 1
            }
        );

        let err = invoke(
            &mut target,
            &[DebugValue::F32(3.0), DebugValue::String("x".into())],
        )
        .unwrap_err();
        assert_eq!(
            err,
            AccessError::Argument {
                index: 0,
                expected: ValueType::I32,
                found: ValueType::F32
            }
        );
    }
}
