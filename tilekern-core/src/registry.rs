//! Name based lookup of kernels, keyed by kernel name and checked against
//! the dtypes and targets each kernel was registered for.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::{
    config::LaunchConfig,
    dtypes::DtypeKind,
    error::Error,
    kernel::{self, CompiledKernel},
    target::Target,
};

pub type BuildFn = fn(DtypeKind, &Target, &LaunchConfig) -> Result<CompiledKernel, Error>;

/// A registration record: what a kernel is called, what it can be built for,
/// and how to build it.
#[derive(Clone, Copy)]
pub struct KernelSpec {
    pub name: &'static str,
    pub dtypes: &'static [DtypeKind],
    pub targets: &'static [&'static str],
    pub builder: BuildFn,
}

impl std::fmt::Debug for KernelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelSpec")
            .field("name", &self.name)
            .field("dtypes", &self.dtypes)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Clone)]
pub struct KernelRegistry {
    kernels: BTreeMap<&'static str, KernelSpec>,
}

impl KernelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `spec`, returning the spec it replaced if the name was taken.
    pub fn register(&mut self, spec: KernelSpec) -> Option<KernelSpec> {
        tracing::debug!(
            kernel = spec.name,
            dtypes = ?spec.dtypes,
            targets = ?spec.targets,
            "registered kernel"
        );
        self.kernels.insert(spec.name, spec)
    }

    pub fn get(&self, name: &str) -> Result<&KernelSpec, Error> {
        self.kernels
            .get(name)
            .ok_or_else(|| Error::UnknownKernel(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kernels.keys().copied()
    }

    pub fn build(
        &self,
        name: &str,
        dtype: DtypeKind,
        target: &str,
        cfg: &LaunchConfig,
    ) -> Result<CompiledKernel, Error> {
        let spec = self.get(name)?;
        if !spec.dtypes.contains(&dtype) {
            return Err(Error::UnsupportedDtype(dtype.name().to_string()));
        }
        if !spec.targets.iter().any(|&t| t == target) {
            return Err(Error::UnsupportedTarget(target.to_string()));
        }
        let target = Target::lookup(target)?;
        (spec.builder)(dtype, &target, cfg)
    }
}

/// Registers every kernel this crate provides.
pub fn init(registry: &mut KernelRegistry) {
    registry.register(KernelSpec {
        name: kernel::KERNEL_NAME,
        dtypes: kernel::DTYPES,
        targets: kernel::TARGET_LIST,
        builder: kernel::build_hard_sigmoid,
    });
}

/// The process wide registry, populated by [init] on first access.
pub fn global() -> &'static KernelRegistry {
    static REGISTRY: OnceLock<KernelRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = KernelRegistry::new();
        init(&mut registry);
        registry
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_has_hard_sigmoid() {
        assert_eq!(global().names().collect::<Vec<_>>(), ["hard_sigmoid"]);
        let k = global()
            .build("hard_sigmoid", DtypeKind::F32, "mlu290", &Default::default())
            .unwrap();
        assert_eq!(k.name, "hard_sigmoid");
        assert_eq!(k.target.name, "mlu290");
    }

    #[test]
    fn test_build_checks_registration() {
        let r = global();
        let cfg = LaunchConfig::default();
        assert_eq!(
            r.build("relu", DtypeKind::F32, "mlu290", &cfg).unwrap_err(),
            Error::UnknownKernel("relu".into())
        );
        // a real device the kernel was not registered for
        assert_eq!(
            r.build("hard_sigmoid", DtypeKind::F32, "mlu220", &cfg).unwrap_err(),
            Error::UnsupportedTarget("mlu220".into())
        );
    }

    #[test]
    fn test_register_replaces() {
        fn fail(_: DtypeKind, t: &Target, _: &LaunchConfig) -> Result<CompiledKernel, Error> {
            Err(Error::UnsupportedTarget(t.name.to_string()))
        }
        let mut r = KernelRegistry::new();
        init(&mut r);
        let old = r.register(KernelSpec {
            name: "hard_sigmoid",
            dtypes: &[DtypeKind::F32],
            targets: &["mlu290"],
            builder: fail,
        });
        assert!(old.is_some());
        assert_eq!(
            r.build("hard_sigmoid", DtypeKind::F16, "mlu290", &Default::default())
                .unwrap_err(),
            Error::UnsupportedDtype("float16".into())
        );
        assert_eq!(
            r.build("hard_sigmoid", DtypeKind::F32, "mlu290", &Default::default())
                .unwrap_err(),
            Error::UnsupportedTarget("mlu290".into())
        );
    }
}
