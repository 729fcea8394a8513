multiversx_sc::imports!();

use crate::errors::*;
use crate::types::{DeferredAction, DeferredKey, DeferredTask};

/// Keyed, replaceable queue of future work. Scheduling under a key that is
/// already queued cancels the previous task. Tasks run when someone calls the
/// owning module's execution endpoint after `execute_after`.
#[multiversx_sc::module]
pub trait DeferredModule {
    fn schedule_deferred(&self, key: &DeferredKey<Self::Api>, delay_seconds: u64, action: DeferredAction) {
        self.cancel_deferred(key);

        let execute_after = self.blockchain().get_block_timestamp() + delay_seconds;
        let task = DeferredTask {
            execute_after,
            action,
        };
        self.deferred_tasks().insert(key.clone(), task);

        self.deferred_scheduled_event(&key.name, &key.account, execute_after);
    }

    fn cancel_deferred(&self, key: &DeferredKey<Self::Api>) -> bool {
        let cancelled = self.deferred_tasks().remove(key).is_some();
        if cancelled {
            self.deferred_cancelled_event(&key.name, &key.account);
        }
        cancelled
    }

    /// Removes and returns a task that is due.
    fn take_due_task(&self, key: &DeferredKey<Self::Api>) -> DeferredTask {
        let task = match self.deferred_tasks().get(key) {
            Some(task) => task,
            None => sc_panic!(ERR_TASK_NOT_FOUND),
        };
        require!(
            self.blockchain().get_block_timestamp() >= task.execute_after,
            ERR_TASK_NOT_DUE
        );
        self.deferred_tasks().remove(key);
        task
    }

    #[view(getDeferredTask)]
    fn get_deferred_task(&self, name: ManagedBuffer, account: ManagedAddress) -> Option<DeferredTask> {
        self.deferred_tasks().get(&DeferredKey { name, account })
    }

    #[event("deferredScheduled")]
    fn deferred_scheduled_event(
        &self,
        #[indexed] name: &ManagedBuffer,
        #[indexed] account: &ManagedAddress,
        execute_after: u64,
    );

    #[event("deferredCancelled")]
    fn deferred_cancelled_event(&self, #[indexed] name: &ManagedBuffer, #[indexed] account: &ManagedAddress);

    #[storage_mapper("deferredTasks")]
    fn deferred_tasks(&self) -> MapMapper<DeferredKey<Self::Api>, DeferredTask>;
}
