//! Receive-funds wizard steps

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReceiveStep {
    Password,
    WalletSelection,
    Review,
    Receipt,
}

impl ReceiveStep {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Password),
            1 => Some(Self::WalletSelection),
            2 => Some(Self::Review),
            3 => Some(Self::Receipt),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Password => 0,
            Self::WalletSelection => 1,
            Self::Review => 2,
            Self::Receipt => 3,
        }
    }

    /// The progress indicator covers every step before the receipt
    pub fn shows_stepper(self) -> bool {
        self != Self::Receipt
    }

    /// The receipt is rendered on its own background
    pub fn is_receipt(self) -> bool {
        self == Self::Receipt
    }
}

#[derive(Debug, Clone)]
pub struct ReceiveFlow {
    step: ReceiveStep,
}

impl ReceiveFlow {
    pub fn new() -> Self {
        Self {
            step: ReceiveStep::Password,
        }
    }

    pub fn at(index: usize) -> Option<Self> {
        ReceiveStep::from_index(index).map(|step| Self { step })
    }

    pub fn step(&self) -> ReceiveStep {
        self.step
    }

    /// Advance one step; stays on the receipt once reached
    pub fn next(&mut self) -> ReceiveStep {
        self.step = ReceiveStep::from_index(self.step.index() + 1).unwrap_or(self.step);
        self.step
    }

    /// Go back one step; the receipt is final and the password step is first
    pub fn back(&mut self) -> ReceiveStep {
        if self.step != ReceiveStep::Receipt && self.step != ReceiveStep::Password {
            self.step = ReceiveStep::from_index(self.step.index() - 1).unwrap_or(self.step);
        }
        self.step
    }

    pub fn reset(&mut self) {
        self.step = ReceiveStep::Password;
    }
}

impl Default for ReceiveFlow {
    fn default() -> Self {
        Self::new()
    }
}
