use crate::Toolkit::molecule::{StructureToolkit, ToolkitConfig};
use crate::Toolkit::smiles::SmilesError;
use log::{info, warn};
use pyo3::ffi::c_str;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule};
use serde::Deserialize;
use std::ffi::CString;
use std::sync::OnceLock;

static RDKIT_MODULE: OnceLock<Py<PyModule>> = OnceLock::new();

/// Loads the RDKit wrapper into the embedded interpreter, once per process
pub fn init_python() -> PyResult<()> {
    if RDKIT_MODULE.get().is_some() {
        return Ok(());
    }
    Python::attach(|py| {
        let code = CString::new(include_str!("../../python/rdkit_wrapper.py"))?;
        let module = PyModule::from_code(
            py,
            code.as_c_str(),
            c_str!("rdkit_wrapper.py"),
            c_str!("rdkit_wrapper"),
        )?;
        RDKIT_MODULE.set(module.unbind()).ok();
        info!("RDKit wrapper loaded");
        Ok(())
    })
}

fn get_module(py: Python<'_>) -> PyResult<Py<PyModule>> {
    RDKIT_MODULE
        .get()
        .map(|module| module.clone_ref(py))
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(
                "init_python() must be called before molecule_info()",
            )
        })
}

/// What RDKit reports for one SMILES
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RdkitMolecule {
    /// canonical SMILES
    pub smiles: String,
    pub mol_weight: f64,
    pub mol_formula: String,
}

pub fn molecule_info(smiles: &str) -> PyResult<RdkitMolecule> {
    Python::attach(|py| {
        let rdkit_py = get_module(py)?;
        let rdkit = rdkit_py.bind(py);
        let binding = rdkit.getattr("molecule_info")?.call1((smiles,))?;
        let info = binding.downcast::<PyDict>()?;
        let json_str: String = py
            .import("json")?
            .call_method1("dumps", (info,))?
            .extract()?;
        serde_json::from_str(&json_str).map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Deserialization error: {}",
                e
            ))
        })
    })
}

/// Toolkit backed by RDKit through an embedded Python interpreter
#[derive(Debug, Clone)]
pub struct RdkitToolkit {
    config: ToolkitConfig,
}

impl RdkitToolkit {
    /// Fails when Python or the `rdkit` package cannot be loaded
    pub fn new(config: ToolkitConfig) -> Result<Self, SmilesError> {
        init_python().map_err(|e| SmilesError::Toolkit(e.to_string()))?;
        Ok(Self { config })
    }
}

impl StructureToolkit for RdkitToolkit {
    type Handle = RdkitMolecule;

    fn parse(&self, identifier: &str) -> Result<RdkitMolecule, SmilesError> {
        molecule_info(identifier.trim()).map_err(|e| {
            if self.config.diagnostics {
                warn!("SMILES Parse Error: {} for input: '{}'", e, identifier);
            }
            SmilesError::Toolkit(e.to_string())
        })
    }

    fn mol_weight(&self, molecule: &RdkitMolecule) -> f64 {
        molecule.mol_weight
    }

    fn canonical_identifier(&self, molecule: &RdkitMolecule) -> String {
        molecule.smiles.clone()
    }

    fn formula(&self, molecule: &RdkitMolecule) -> String {
        molecule.mol_formula.clone()
    }
}
