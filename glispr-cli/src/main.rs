fn main() {
    glispr_cli::run()
}
