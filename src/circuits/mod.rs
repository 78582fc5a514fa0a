// src/circuits/mod.rs

//! Structures for representing and building ordered gate sequences.
//!
//! A `Circuit` captures one specific program: the gates in application order,
//! the set of qubits they touch, and the width of the classical register the
//! measurements write into. The order of the gate list is the order of
//! execution within every shot.

use crate::core::QubitId;
use crate::operations::Gate;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// An ordered sequence of gates applied to a set of qubits.
///
/// Analogy: similar to `cirq.Circuit` or a pyquil `Program`, including the
/// declared classical register the measurements target.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    /// The unique set of qubits involved across all gates.
    qubits: HashSet<QubitId>,
    /// The ordered gate sequence defining the circuit's logic.
    gates: Vec<Gate>,
    /// Width of the classical register (highest measured bit index + 1).
    num_bits: usize,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self {
            qubits: HashSet::new(),
            gates: Vec::new(),
            num_bits: 0,
        }
    }

    /// Appends a gate, registering its qubits and classical bits.
    pub fn add_gate(&mut self, gate: Gate) {
        for qubit in gate.involved_qubits() {
            self.qubits.insert(qubit);
        }
        if let Some(bit) = gate.max_bit() {
            self.num_bits = self.num_bits.max(bit + 1);
        }
        self.gates.push(gate);
    }

    /// Appends multiple gates from an iterator.
    pub fn add_gates<I>(&mut self, gates: I)
    where
        I: IntoIterator<Item = Gate>,
    {
        for gate in gates {
            self.add_gate(gate);
        }
    }

    /// The set of unique qubit IDs involved in this circuit.
    pub fn qubits(&self) -> &HashSet<QubitId> {
        &self.qubits
    }

    /// The ordered gate sequence.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Width of the classical register written by this circuit's measurements.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Total number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns `true` if the circuit contains no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Builds `Circuit` instances with method chaining.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self { circuit: Circuit::new() }
    }

    /// Adds a single gate, returning `self` for chaining.
    pub fn add_gate(mut self, gate: Gate) -> Self {
        self.circuit.add_gate(gate);
        self
    }

    /// Adds multiple gates from an iterator, returning `self` for chaining.
    pub fn add_gates<I>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = Gate>,
    {
        self.circuit.add_gates(gates);
        self
    }

    /// Finalizes the construction and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.gates.is_empty() {
            return writeln!(f, "qdie::Circuit[0 gates on 0 qubits]");
        }

        let mut sorted_qubits: Vec<QubitId> = self.qubits.iter().cloned().collect();
        sorted_qubits.sort();
        let qubit_to_row: HashMap<QubitId, usize> =
            sorted_qubits.iter().enumerate().map(|(i, q)| (*q, i)).collect();

        const GATE_WIDTH: usize = 7;
        const WIRE: &str = "───────";

        // Centers a gate symbol within a wire segment.
        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                return symbol.chars().take(GATE_WIDTH).collect();
            }
            let pre = (GATE_WIDTH - slen) / 2;
            let post = GATE_WIDTH - slen - pre;
            format!("{}{}{}", "─".repeat(pre), symbol, "─".repeat(post))
        }

        fn gate_symbol(gate: &Gate) -> (QubitId, String) {
            match gate {
                Gate::Hadamard { target } => (*target, "H".to_string()),
                Gate::PauliX { target } => (*target, "X".to_string()),
                Gate::PhaseShift { target, .. } => (*target, "P".to_string()),
                Gate::Measure { target, bit } => (*target, format!("M{}", bit)),
                Gate::ClassicallyControlled { bit, gate } => {
                    let (target, inner) = gate_symbol(gate);
                    (target, format!("{}?{}", inner, bit))
                }
            }
        }

        let mut grid: Vec<Vec<String>> =
            vec![vec![WIRE.to_string(); self.gates.len()]; sorted_qubits.len()];
        for (t, gate) in self.gates.iter().enumerate() {
            let (target, symbol) = gate_symbol(gate);
            if let Some(r) = qubit_to_row.get(&target) {
                grid[*r][t] = format_gate(&symbol);
            }
        }

        writeln!(
            f,
            "qdie::Circuit[{} gates on {} qubits, {} classical bits]",
            self.gates.len(),
            sorted_qubits.len(),
            self.num_bits
        )?;
        let label_width = sorted_qubits
            .iter()
            .map(|q| format!("{}", q).len())
            .max()
            .unwrap_or(0);
        for (r, qubit) in sorted_qubits.iter().enumerate() {
            let label = format!("{}: ", qubit);
            write!(f, "{:<width$}", label, width = label_width + 2)?;
            writeln!(f, "{}", grid[r].join(""))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
