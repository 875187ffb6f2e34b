fn main() {
    fondos_frontend::run();
}
