#[no_mangle]
#[inline(never)]
pub extern "C" fn relative_path() {
    crate::announce("relative_path");
}
