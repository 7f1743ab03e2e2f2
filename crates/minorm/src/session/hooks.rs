use super::Session;
use crate::hooks::{Hook, Hooks};

impl Session {
    /// Invoke `hook` on `receiver`, or on the bound schema's model sample.
    ///
    /// Errors returned by the hook are logged and otherwise ignored. Without a
    /// receiver and without a bound schema nothing is called.
    pub fn call_method(&mut self, hook: Hook, receiver: Option<&mut dyn Hooks>) {
        let result = match receiver {
            Some(receiver) => hook.dispatch(receiver, self),
            None => {
                let Some(schema) = self.ref_table.as_mut() else {
                    return;
                };
                // The sample is lent out so the hook can observe the session.
                let mut sample = std::mem::replace(&mut schema.model, Box::new(()));
                let result = hook.dispatch(sample.as_mut(), self);
                if let Some(schema) = self.ref_table.as_mut() {
                    schema.model = sample;
                }
                result
            }
        };

        if let Err(err) = result {
            tracing::error!(hook = hook.name(), error = %err, "hook failed");
        }
    }
}
