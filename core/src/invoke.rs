//! Guarded call sites
//!
//! Every read, write and call the inspector performs on a live object goes
//! through here. The object is locked for the duration of one accessor call,
//! panics inside user code are caught, and failures are logged and returned.
//! Nothing here touches the registry cache.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::AccessError;
use crate::host::LiveObject;
use crate::model::MemberInfo;
use crate::types::DebugValue;

/// Read a field or property
pub fn read(member: &MemberInfo, object: &LiveObject) -> Result<DebugValue, AccessError> {
    guarded(member, object, "read", || {
        let guard = object.lock();
        member.get(&*guard)
    })
}

/// Write a field or property
pub fn write(
    member: &MemberInfo,
    object: &LiveObject,
    value: DebugValue,
) -> Result<(), AccessError> {
    guarded(member, object, "write", || {
        let mut guard = object.lock();
        member.set(&mut *guard, value)
    })
}

/// Invoke a method
pub fn call(
    member: &MemberInfo,
    object: &LiveObject,
    args: &[DebugValue],
) -> Result<DebugValue, AccessError> {
    guarded(member, object, "call", || {
        let mut guard = object.lock();
        member.invoke(&mut *guard, args)
    })
}

fn guarded<R>(
    member: &MemberInfo,
    object: &LiveObject,
    action: &'static str,
    f: impl FnOnce() -> Result<R, AccessError>,
) -> Result<R, AccessError> {
    let result = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(AccessError::Panicked(panic_message(payload.as_ref()))),
    };

    if let Err(err) = &result {
        tracing::error!(
            member = %member.name,
            object = %object.label(),
            action,
            "debug access failed: {err}"
        );
    }
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
