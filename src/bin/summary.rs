fn main() {
    symtrans::cli::summary_main()
}
