#[no_mangle]
#[inline(never)]
pub extern "C" fn denorm_path() {
    crate::announce("denorm_path");
}
