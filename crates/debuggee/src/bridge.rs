//! Cross-module calls: load the second module at runtime and call into it.
//!
//! Loading is split behind [`ModuleLoader`] so the lookup and failure semantics
//! are the same on every platform; only `sys` differs (`dlopen`/`dlsym` on Unix,
//! `LoadLibraryW`/`GetProcAddress` on Windows). Every failure is a
//! [`BridgeError`] that the caller propagates; nothing here falls back to a
//! silent no-op.

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use crate::config::HarnessConfig;

/// Base name of the second module (`libdebuggee2.so`, `libdebuggee2.dylib`,
/// `debuggee2.dll`).
pub const MODULE_BASE_NAME: &str = "debuggee2";

pub use debuggee2::ENTRY_SYMBOL;

pub type EntryFn = unsafe extern "C" fn();

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("could not locate {file}; looked for:\n{}", render_paths(.checked))]
    ModuleNotFound { file: String, checked: Vec<PathBuf> },

    #[error("could not load {}: {reason}", .path.display())]
    LoadFailed { path: PathBuf, reason: String },

    #[error("symbol {symbol:?} not found in {}: {reason}", .path.display())]
    SymbolNotFound {
        symbol: String,
        path: PathBuf,
        reason: String,
    },

    #[error("could not unload {}: {reason}", .path.display())]
    CloseFailed { path: PathBuf, reason: String },
}

fn render_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A loaded module. Dropping the handle leaves the module loaded; unloading
/// only happens through [`ModuleLoader::close`].
#[derive(Debug)]
pub struct ModuleHandle {
    raw: NonNull<c_void>,
    path: PathBuf,
}

impl ModuleHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub trait ModuleLoader {
    fn open(&self, path: &Path) -> Result<ModuleHandle, BridgeError>;
    fn symbol(&self, module: &ModuleHandle, name: &str) -> Result<EntryFn, BridgeError>;
    fn close(&self, module: ModuleHandle) -> Result<(), BridgeError>;
}

/// The platform's dynamic loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLoader;

impl ModuleLoader for SystemLoader {
    fn open(&self, path: &Path) -> Result<ModuleHandle, BridgeError> {
        let raw = sys::open(path).map_err(|reason| BridgeError::LoadFailed {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(ModuleHandle {
            raw,
            path: path.to_path_buf(),
        })
    }

    fn symbol(&self, module: &ModuleHandle, name: &str) -> Result<EntryFn, BridgeError> {
        let raw = sys::symbol(module.raw, name).map_err(|reason| BridgeError::SymbolNotFound {
            symbol: name.to_string(),
            path: module.path.clone(),
            reason,
        })?;
        // Every symbol this harness resolves is a `extern "C" fn()` export.
        Ok(unsafe { std::mem::transmute::<*mut c_void, EntryFn>(raw.as_ptr()) })
    }

    fn close(&self, module: ModuleHandle) -> Result<(), BridgeError> {
        sys::close(module.raw).map_err(|reason| BridgeError::CloseFailed {
            path: module.path,
            reason,
        })
    }
}

pub fn module_file_name(base: &str) -> String {
    format!("{DLL_PREFIX}{base}{DLL_SUFFIX}")
}

/// Finds the module file relative to the running executable.
#[derive(Debug, Clone, Default)]
pub struct ModuleLocator {
    pub exe: Option<PathBuf>,
    pub override_path: Option<PathBuf>,
}

impl ModuleLocator {
    pub fn from_config(config: &HarnessConfig) -> Self {
        ModuleLocator {
            exe: config.exe.clone(),
            override_path: config.sharedlib_override.clone(),
        }
    }

    /// `<exe_dir>/<file>`, then `<exe_dir>/deps/<file>` (test binaries run from
    /// `target/*/deps`), then `<exe_dir>/../<file>`.
    pub fn candidates(&self, base: &str) -> Vec<PathBuf> {
        let file = module_file_name(base);
        let mut out = Vec::new();
        let Some(exe_dir) = self.exe.as_deref().and_then(Path::parent) else {
            return out;
        };
        out.push(exe_dir.join(&file));
        out.push(exe_dir.join("deps").join(&file));
        if let Some(parent) = exe_dir.parent() {
            out.push(parent.join(&file));
        }
        out
    }

    pub fn resolve(&self, base: &str) -> Result<PathBuf, BridgeError> {
        let file = module_file_name(base);

        if let Some(path) = &self.override_path {
            if path.is_file() {
                return Ok(path.clone());
            }
            return Err(BridgeError::ModuleNotFound {
                file,
                checked: vec![path.clone()],
            });
        }

        let checked = self.candidates(base);
        if let Some(found) = checked.iter().find(|p| p.is_file()) {
            return Ok(found.clone());
        }

        // The Windows loader searches the executable's directory first on its
        // own; hand it the bare name.
        if cfg!(windows) {
            return Ok(PathBuf::from(file));
        }

        Err(BridgeError::ModuleNotFound { file, checked })
    }
}

/// Load `base`, resolve `symbol` in it and call it once with no arguments.
///
/// The module stays loaded afterwards: the scenario's process exits shortly
/// after, and a debugger may still be holding breakpoints in its code.
pub fn invoke_remote(
    loader: &dyn ModuleLoader,
    locator: &ModuleLocator,
    base: &str,
    symbol: &str,
) -> Result<(), BridgeError> {
    let path = locator.resolve(base)?;
    let module = loader.open(&path)?;
    tracing::debug!(path = %module.path().display(), "module loaded");

    let entry = loader.symbol(&module, symbol)?;
    tracing::debug!(symbol, "calling into module");
    unsafe { entry() };
    Ok(())
}

#[cfg(unix)]
mod sys {
    use std::ffi::{c_void, CStr, CString};
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;
    use std::ptr::NonNull;

    pub(super) fn open(path: &Path) -> Result<NonNull<c_void>, String> {
        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|e| e.to_string())?;
        let raw = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW) };
        NonNull::new(raw).ok_or_else(last_error)
    }

    pub(super) fn symbol(module: NonNull<c_void>, name: &str) -> Result<NonNull<c_void>, String> {
        let c_name = CString::new(name).map_err(|e| e.to_string())?;
        unsafe {
            // Clear any stale error so the one read below belongs to this call.
            libc::dlerror();
            let raw = libc::dlsym(module.as_ptr(), c_name.as_ptr());
            NonNull::new(raw).ok_or_else(last_error)
        }
    }

    pub(super) fn close(module: NonNull<c_void>) -> Result<(), String> {
        if unsafe { libc::dlclose(module.as_ptr()) } == 0 {
            Ok(())
        } else {
            Err(last_error())
        }
    }

    fn last_error() -> String {
        let msg = unsafe { libc::dlerror() };
        if msg.is_null() {
            return "unknown loader error".to_string();
        }
        unsafe { CStr::from_ptr(msg) }
            .to_string_lossy()
            .into_owned()
    }
}

#[cfg(windows)]
mod sys {
    use std::ffi::{c_char, c_void, CString};
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;
    use std::ptr::NonNull;

    #[link(name = "kernel32")]
    extern "system" {
        fn LoadLibraryW(name: *const u16) -> *mut c_void;
        fn GetProcAddress(module: *mut c_void, name: *const c_char) -> *mut c_void;
        fn FreeLibrary(module: *mut c_void) -> i32;
    }

    pub(super) fn open(path: &Path) -> Result<NonNull<c_void>, String> {
        let wide: Vec<u16> = path.as_os_str().encode_wide().chain(Some(0)).collect();
        let raw = unsafe { LoadLibraryW(wide.as_ptr()) };
        NonNull::new(raw).ok_or_else(last_error)
    }

    pub(super) fn symbol(module: NonNull<c_void>, name: &str) -> Result<NonNull<c_void>, String> {
        let c_name = CString::new(name).map_err(|e| e.to_string())?;
        let raw = unsafe { GetProcAddress(module.as_ptr(), c_name.as_ptr()) };
        NonNull::new(raw).ok_or_else(last_error)
    }

    pub(super) fn close(module: NonNull<c_void>) -> Result<(), String> {
        if unsafe { FreeLibrary(module.as_ptr()) } != 0 {
            Ok(())
        } else {
            Err(last_error())
        }
    }

    fn last_error() -> String {
        std::io::Error::last_os_error().to_string()
    }
}
