#[no_mangle]
#[inline(never)]
pub extern "C" fn remote_path2() {
    crate::announce("remote_path2");
}
