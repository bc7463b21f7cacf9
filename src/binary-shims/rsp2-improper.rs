fn main() { rsp2_tasks::entry_points::improper() }
