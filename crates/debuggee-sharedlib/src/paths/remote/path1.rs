#[no_mangle]
#[inline(never)]
pub extern "C" fn remote_path1() {
    crate::announce("remote_path1");
}
