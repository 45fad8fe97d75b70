// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Email sender doubles.

use async_trait::async_trait;
use contact_form_relay::delivery::{DeliveryError, DeliveryReceipt, EmailMessage, EmailSender};
use std::sync::Mutex;

/// How the double answers.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Accept,
    Reject,
    Unreachable,
    Garbled,
}

/// Records every message it is asked to send.
pub struct RecordingSender {
    behavior: Behavior,
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingSender {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new(Behavior::Accept)
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        let attempt = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(message.clone());
            sent.len()
        };

        match self.behavior {
            Behavior::Accept => Ok(DeliveryReceipt {
                id: format!("msg_{attempt}"),
            }),
            Behavior::Reject => Err(DeliveryError::Rejected {
                status: 403,
                message: "The example.com domain is not verified".to_string(),
            }),
            Behavior::Unreachable => Err(DeliveryError::Transport(
                "connection refused".to_string(),
            )),
            Behavior::Garbled => Err(DeliveryError::MalformedResponse(
                "expected value at line 1 column 1".to_string(),
            )),
        }
    }
}
