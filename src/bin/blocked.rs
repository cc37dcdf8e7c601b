use symtrans::{cli, kernels::Variant};

fn main() {
    cli::main_for(Variant::Blocked)
}
