// Platform-specific filesystem operations

use std::fs;
use std::path::Path;

use crate::core::metrics::used_percent;

/// Used percentage of the filesystem holding `path`, from `statvfs(2)`.
///
/// Returns `-1.0` when the call fails or the volume reports no blocks.
#[cfg(unix)]
pub fn filesystem_usage_percent(path: &Path) -> f64 {
    use std::ffi::CString;
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return -1.0;
    };
    let mut stat = MaybeUninit::<libc::statvfs>::uninit();

    // SAFETY: `c_path` is NUL-terminated and `stat` is a valid out-pointer.
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if ret != 0 {
        log::debug!("statvfs failed for {:?}", path);
        return -1.0;
    }

    // SAFETY: statvfs returned 0, so the struct is initialised.
    let stat = unsafe { stat.assume_init() };
    used_percent(stat.f_blocks as f64, stat.f_bavail as f64)
}

#[cfg(not(unix))]
pub fn filesystem_usage_percent(_path: &Path) -> f64 {
    -1.0
}

/// Size of a regular file in bytes, `-1` when it does not exist or is not a file
pub fn file_size(path: &Path) -> i64 {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => i64::try_from(meta.len()).unwrap_or(i64::MAX),
        _ => -1,
    }
}
