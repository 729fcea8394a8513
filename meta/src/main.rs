fn main() {
    multiversx_sc_meta_lib::cli_main::<native_system::AbiProvider>();
}
