//! Scriptable RPC client for tests and the demo binary.
//!
//! Records every invoke/select call so tests can assert on the full
//! dispatch history, and can be told to fail the next N invocations to
//! exercise the select-then-retry policy.

use std::collections::VecDeque;

use crate::app::ports::{RpcClient, RpcContext, RpcError};
use crate::value::ChannelValue;

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcCall {
    Invoke {
        service: String,
        operation: String,
        args: Vec<ChannelValue>,
        ctx: RpcContext,
    },
    Select {
        service: String,
        device: String,
        ctx: RpcContext,
    },
}

/// Simulated RPC endpoint.
pub struct SimRpc {
    /// Full call history, in order.
    pub calls: Vec<RpcCall>,
    next_ctx: u64,
    responses: VecDeque<ChannelValue>,
    default_response: ChannelValue,
    fail_invokes: usize,
    fail_selects: usize,
}

impl SimRpc {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_ctx: 0,
            responses: VecDeque::new(),
            default_response: ChannelValue::Str("ok".to_string()),
            fail_invokes: 0,
            fail_selects: 0,
        }
    }

    /// Set the response returned when the scripted queue is empty.
    pub fn with_default_response(mut self, response: ChannelValue) -> Self {
        self.default_response = response;
        self
    }

    /// Queue a one-shot response for the next successful invoke.
    pub fn push_response(&mut self, response: ChannelValue) {
        self.responses.push_back(response);
    }

    /// Make the next `n` invokes fail with a transport error.
    pub fn fail_next_invokes(&mut self, n: usize) {
        self.fail_invokes = n;
    }

    /// Make the next `n` device selections fail.
    pub fn fail_next_selects(&mut self, n: usize) {
        self.fail_selects = n;
    }

    pub fn invoke_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RpcCall::Invoke { .. }))
            .count()
    }

    pub fn select_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RpcCall::Select { .. }))
            .count()
    }
}

impl Default for SimRpc {
    fn default() -> Self {
        Self::new()
    }
}

impl RpcClient for SimRpc {
    fn new_context(&mut self) -> RpcContext {
        let ctx = RpcContext(self.next_ctx);
        self.next_ctx += 1;
        ctx
    }

    fn invoke(
        &mut self,
        service: &str,
        operation: &str,
        args: &[ChannelValue],
        ctx: RpcContext,
    ) -> Result<ChannelValue, RpcError> {
        self.calls.push(RpcCall::Invoke {
            service: service.to_string(),
            operation: operation.to_string(),
            args: args.to_vec(),
            ctx,
        });
        if self.fail_invokes > 0 {
            self.fail_invokes -= 1;
            return Err(RpcError::Transport(format!(
                "simulated invoke failure on {service}::{operation}"
            )));
        }
        Ok(self
            .responses
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone()))
    }

    fn select_device(
        &mut self,
        service: &str,
        device: &str,
        ctx: RpcContext,
    ) -> Result<(), RpcError> {
        self.calls.push(RpcCall::Select {
            service: service.to_string(),
            device: device.to_string(),
            ctx,
        });
        if self.fail_selects > 0 {
            self.fail_selects -= 1;
            return Err(RpcError::Transport(format!(
                "simulated select failure on {service}/{device}"
            )));
        }
        Ok(())
    }
}
